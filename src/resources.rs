//! Ownership of the handles derived from files.
//!
//! Every track owns a source handle (the decodable audio) and optionally a cover
//! handle (embedded art). Handles are minted here when a track is adopted and
//! released here exactly once. A source the engine is still attached to is only
//! released after the engine lets go of it.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::library::{Track, TrackDraft, TrackId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

/// Handle to the decodable audio of one track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SourceHandle(HandleId);

/// Handle to a track's embedded cover image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CoverHandle(HandleId);

impl SourceHandle {
    pub fn id(self) -> HandleId {
        self.0
    }
}

impl CoverHandle {
    pub fn id(self) -> HandleId {
        self.0
    }
}

/// Embedded picture bytes and their declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug)]
enum Resource {
    Source(PathBuf),
    Cover(CoverArt),
}

#[derive(Debug)]
struct Slot {
    resource: Resource,
    attached: bool,
    revoke_pending: bool,
}

/// What a revoke request did to a single handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Revocation {
    /// The handle was live and is now released.
    Released,
    /// The engine is still attached; release happens on detach.
    Deferred,
    /// Already released or never adopted.
    Noop,
}

#[derive(Debug, Default)]
pub struct ResourceManager {
    next_id: u64,
    slots: HashMap<HandleId, Slot>,
    released: usize,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, resource: Resource) -> HandleId {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        self.slots.insert(
            id,
            Slot {
                resource,
                attached: false,
                revoke_pending: false,
            },
        );
        id
    }

    /// Take ownership of a draft's resources and build the track that refers to them.
    pub fn adopt(&mut self, draft: TrackDraft) -> Track {
        let source = SourceHandle(self.mint(Resource::Source(draft.file.path.clone())));
        let cover = draft.cover.map(|art| CoverHandle(self.mint(Resource::Cover(art))));

        Track {
            id: TrackId(source.0.0),
            title: draft.title,
            artist: draft.artist,
            album: draft.album,
            cover,
            source,
            file: draft.file,
            duration: draft.duration,
        }
    }

    /// Release both of `track`'s handles. Repeated calls are no-ops.
    pub fn revoke(&mut self, track: &Track) {
        self.revoke_handle(track.source.id());
        if let Some(cover) = track.cover {
            self.revoke_handle(cover.id());
        }
    }

    pub fn revoke_all(&mut self, tracks: &[Track]) {
        for track in tracks {
            self.revoke(track);
        }
    }

    pub fn revoke_handle(&mut self, id: HandleId) -> Revocation {
        let Some(slot) = self.slots.get_mut(&id) else {
            return Revocation::Noop;
        };

        if slot.attached {
            if slot.revoke_pending {
                return Revocation::Noop;
            }
            slot.revoke_pending = true;
            debug!(?id, "deferring revocation of attached source");
            return Revocation::Deferred;
        }

        self.slots.remove(&id);
        self.released += 1;
        Revocation::Released
    }

    /// Mark `handle` as in use by the engine and return the path to decode.
    ///
    /// Returns `None` for a handle that is released or awaiting release.
    pub fn attach(&mut self, handle: SourceHandle) -> Option<PathBuf> {
        let slot = self.slots.get_mut(&handle.id())?;
        if slot.revoke_pending {
            return None;
        }
        match &slot.resource {
            Resource::Source(path) => {
                slot.attached = true;
                Some(path.clone())
            }
            Resource::Cover(_) => None,
        }
    }

    /// The engine has let go of `handle`; complete a deferred revocation if one is pending.
    pub fn detach(&mut self, handle: SourceHandle) {
        let Some(slot) = self.slots.get_mut(&handle.id()) else {
            return;
        };
        slot.attached = false;
        if slot.revoke_pending {
            self.slots.remove(&handle.id());
            self.released += 1;
            debug!(id = ?handle.id(), "completed deferred revocation");
        }
    }

    pub fn cover(&self, handle: CoverHandle) -> Option<&CoverArt> {
        match self.slots.get(&handle.id()).map(|s| &s.resource) {
            Some(Resource::Cover(art)) => Some(art),
            _ => None,
        }
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Handles currently owned, including those awaiting a deferred release.
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    /// Total handles released over this manager's lifetime.
    pub fn released_count(&self) -> usize {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::FileResource;

    fn draft(name: &str, with_cover: bool) -> TrackDraft {
        let mut d = TrackDraft::fallback(FileResource::new(
            format!("/music/{name}.mp3"),
            Some("audio/mpeg"),
        ));
        if with_cover {
            d.cover = Some(CoverArt {
                mime: Some("image/jpeg".into()),
                data: vec![0xff, 0xd8],
            });
        }
        d
    }

    #[test]
    fn adopt_mints_unique_handles() {
        let mut rm = ResourceManager::new();
        let a = rm.adopt(draft("a", true));
        let b = rm.adopt(draft("b", false));

        assert_ne!(a.source, b.source);
        assert_ne!(a.id, b.id);
        assert_eq!(rm.attach(a.source), Some(PathBuf::from("/music/a.mp3")));
        assert!(rm.cover(a.cover.unwrap()).is_some());
        assert_eq!(rm.live_count(), 3);
    }

    #[test]
    fn revoking_twice_is_the_same_as_once() {
        let mut rm = ResourceManager::new();
        let a = rm.adopt(draft("a", true));

        rm.revoke(&a);
        assert_eq!(rm.live_count(), 0);
        assert_eq!(rm.released_count(), 2);

        rm.revoke(&a);
        assert_eq!(rm.live_count(), 0);
        assert_eq!(rm.released_count(), 2);
        assert_eq!(rm.revoke_handle(a.source.id()), Revocation::Noop);
    }

    #[test]
    fn revoking_unknown_handle_is_noop() {
        let mut rm = ResourceManager::new();
        assert_eq!(rm.revoke_handle(HandleId(42)), Revocation::Noop);
        assert_eq!(rm.released_count(), 0);
    }

    #[test]
    fn attached_source_is_released_only_after_detach() {
        let mut rm = ResourceManager::new();
        let a = rm.adopt(draft("a", false));

        assert!(rm.attach(a.source).is_some());
        assert_eq!(rm.revoke_handle(a.source.id()), Revocation::Deferred);
        assert!(rm.is_live(a.source.id()));
        // A second request while pending does not double count.
        assert_eq!(rm.revoke_handle(a.source.id()), Revocation::Noop);
        // Pending sources cannot be attached again.
        assert!(rm.attach(a.source).is_none());

        rm.detach(a.source);
        assert!(!rm.is_live(a.source.id()));
        assert_eq!(rm.released_count(), 1);

        rm.detach(a.source);
        assert_eq!(rm.released_count(), 1);
    }

    #[test]
    fn detach_without_pending_revoke_keeps_handle() {
        let mut rm = ResourceManager::new();
        let a = rm.adopt(draft("a", false));
        rm.attach(a.source);
        rm.detach(a.source);
        assert!(rm.is_live(a.source.id()));
        assert_eq!(rm.revoke_handle(a.source.id()), Revocation::Released);
    }
}
