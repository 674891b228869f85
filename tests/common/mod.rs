#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::{
    cell::RefCell,
    collections::HashSet,
    rc::Rc,
};

use delta_array::{
    BitReader, BitWrite, Entry, HandleStatus, NetId, RefHandle, Resolver, Serde, SerdeErr,
    StructCodec, SyncArray, SyncDelegate, UnsignedVariableInteger,
};

/// Test payload: a pickup that may reference an owning entity by handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pickup {
    pub kind: u8,
    pub count: u8,
    pub owner: RefHandle,
    /// Set during decode once the owner handle is resolvable.
    pub owner_linked: bool,
}

impl Pickup {
    pub fn new(kind: u8, count: u8) -> Self {
        Self {
            kind,
            count,
            owner: 0,
            owner_linked: false,
        }
    }

    pub fn owned(kind: u8, count: u8, owner: RefHandle) -> Self {
        Self {
            kind,
            count,
            owner,
            owner_linked: false,
        }
    }
}

/// The set of handles the observer-side world currently knows about,
/// shared between the codec and the resolver the way a real package map
/// would be.
pub type KnownHandles = Rc<RefCell<HashSet<RefHandle>>>;

pub struct PickupCodec {
    known: KnownHandles,
}

impl PickupCodec {
    pub fn new() -> (Self, KnownHandles) {
        let known: KnownHandles = Rc::new(RefCell::new(HashSet::new()));
        (
            Self {
                known: known.clone(),
            },
            known,
        )
    }
}

impl StructCodec<Pickup> for PickupCodec {
    fn encode(&self, payload: &Pickup, writer: &mut dyn BitWrite) {
        payload.kind.ser(writer);
        payload.count.ser(writer);
        UnsignedVariableInteger::<7>::new(payload.owner).ser(writer);
    }

    fn decode(
        &self,
        reader: &mut BitReader,
        payload: &mut Pickup,
    ) -> Result<HashSet<RefHandle>, SerdeErr> {
        payload.kind = u8::de(reader)?;
        payload.count = u8::de(reader)?;
        payload.owner = UnsignedVariableInteger::<7>::de(reader)?.get();

        let mut unresolved = HashSet::new();
        if payload.owner != 0 {
            if self.known.borrow().contains(&payload.owner) {
                payload.owner_linked = true;
            } else {
                payload.owner_linked = false;
                unresolved.insert(payload.owner);
            }
        }
        Ok(unresolved)
    }
}

pub struct TestResolver {
    known: KnownHandles,
    broken: HashSet<RefHandle>,
}

impl TestResolver {
    pub fn new(known: KnownHandles) -> Self {
        Self {
            known,
            broken: HashSet::new(),
        }
    }

    pub fn mark_broken(&mut self, handle: RefHandle) {
        self.broken.insert(handle);
    }
}

impl Resolver for TestResolver {
    fn status(&self, handle: RefHandle) -> HandleStatus {
        if self.broken.contains(&handle) {
            HandleStatus::Broken
        } else if self.known.borrow().contains(&handle) {
            HandleStatus::Resolved
        } else {
            HandleStatus::Pending
        }
    }
}

/// Records every delegate notification, in order.
#[derive(Default)]
pub struct EventLog {
    pub added: Vec<NetId>,
    pub changed: Vec<NetId>,
    pub removed: Vec<NetId>,
}

impl SyncDelegate<Pickup> for EventLog {
    fn on_pre_remove(&mut self, entry: &Entry<Pickup>) {
        self.removed.push(entry.id());
    }

    fn on_post_add(&mut self, entry: &Entry<Pickup>) {
        self.added.push(entry.id());
    }

    fn on_post_change(&mut self, entry: &Entry<Pickup>) {
        self.changed.push(entry.id());
    }
}

/// The order-insensitive view the protocol guarantees convergence on.
pub fn id_payload_set(array: &SyncArray<Pickup>) -> HashSet<(NetId, Pickup)> {
    array
        .iter()
        .map(|entry| (entry.id(), entry.payload.clone()))
        .collect()
}
