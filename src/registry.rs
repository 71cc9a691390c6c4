use crate::client::{Client, ConnId};
use crate::role::{RoleAssigner, Seat};
use hashbrown::HashMap;
use tracing::info;
use uuid::Uuid;

// Every live connection at the table, players and spectators alike.
// The registry is owned by the game server task, which is the only thing
// that ever mutates or iterates it.
#[derive(Debug)]
pub struct ConnectionRegistry<S> {
    clients: HashMap<ConnId, Client<S>>,
    assigner: RoleAssigner,
}

impl<S> Default for ConnectionRegistry<S> {
    fn default() -> Self {
        ConnectionRegistry {
            clients: HashMap::new(),
            assigner: RoleAssigner::default(),
        }
    }
}

impl<S> ConnectionRegistry<S> {
    pub fn register(&mut self, sender: S) -> (ConnId, Seat) {
        let id = Uuid::new_v4().as_simple().to_string();
        let seat = self.assigner.assign();
        info!("registering {} as {}", id, seat.display_name);
        self.clients.insert(
            id.clone(),
            Client {
                id: id.clone(),
                seat: seat.clone(),
                sender,
            },
        );
        (id, seat)
    }

    pub fn unregister(&mut self, id: &str) -> Option<Client<S>> {
        let client = self.clients.remove(id);
        if let Some(c) = &client {
            info!("unregistered {} ({})", id, c.seat.display_name);
        }
        client
    }

    pub fn get(&self, id: &str) -> Option<&Client<S>> {
        self.clients.get(id)
    }

    pub fn for_each<F: FnMut(&Client<S>)>(&self, visitor: F) {
        self.clients.values().for_each(visitor);
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    // Players that are still connected
    pub fn players(&self) -> Vec<&Client<S>> {
        self.clients.values().filter(|c| c.seat.is_player()).collect()
    }

    pub fn spectator_count(&self) -> usize {
        self.clients.values().filter(|c| !c.seat.is_player()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;
    use common::Mark;

    #[test]
    fn test_register_assigns_roles() {
        let mut registry = ConnectionRegistry::default();
        let (id1, seat1) = registry.register(());
        let (id2, seat2) = registry.register(());
        let (id3, seat3) = registry.register(());
        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_eq!(seat1.symbol, Some(Mark::X));
        assert_eq!(seat2.symbol, Some(Mark::O));
        assert_eq!(seat3.role, Role::Spectator);
        assert_eq!(seat3.display_name, "spectator-1");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.players().len(), 2);
        assert_eq!(registry.spectator_count(), 1);
        assert_eq!(registry.get(&id2).unwrap().seat, seat2);
    }

    #[test]
    fn test_unregister_does_not_free_slots() {
        let mut registry = ConnectionRegistry::default();
        let (player1, _) = registry.register(());
        registry.register(());
        let (spectator1, _) = registry.register(());

        assert!(registry.unregister(&player1).is_some());
        assert!(registry.unregister(&spectator1).is_some());
        assert!(registry.unregister(&spectator1).is_none());
        assert_eq!(registry.len(), 1);

        let (_, seat) = registry.register(());
        assert_eq!(seat.role, Role::Spectator);
        assert_eq!(seat.display_name, "spectator-2");
        assert_eq!(registry.players().len(), 1);
    }

    #[test]
    fn test_for_each_visits_everyone() {
        let mut registry = ConnectionRegistry::default();
        for _ in 0..5 {
            registry.register(());
        }
        let mut names = Vec::new();
        registry.for_each(|c| names.push(c.seat.display_name.clone()));
        names.sort();
        assert_eq!(
            names,
            vec!["player-1", "player-2", "spectator-1", "spectator-2", "spectator-3"]
        );
    }
}
