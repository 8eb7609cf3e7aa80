//! Artifact lifecycle around chunk acceptance and removal

use super::{ArtifactLedger, Provenance};
use crate::dungeon::Chunk;

/// Outcome of wiping a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WipeSummary {
    /// Returned to the pool (`NotCreated`)
    pub preserved: usize,
    /// Retired for good (`Abandoned`)
    pub retired: usize,
}

/// Promote `Created` artifacts on a stamped chunk to `GeneratedInWorld`
///
/// Does nothing on an unstamped chunk. Running it twice is harmless.
pub fn mark_generated_if_ready(chunk: &mut Chunk, ledger: &mut ArtifactLedger) -> usize {
    if !chunk.is_stamped() {
        return 0;
    }

    let mut promoted = 0;
    for obj in chunk.objects.iter_mut() {
        let Some(key) = obj.artifact else { continue };
        if ledger.state(key) == Provenance::Created
            && ledger.transition(key, Provenance::GeneratedInWorld).is_ok()
        {
            obj.owner = None;
            promoted += 1;
        }
    }
    promoted
}

/// Give back every artifact of a chunk that is being thrown away before acceptance
pub fn preserve_on_discard(chunk: &mut Chunk, ledger: &mut ArtifactLedger) -> usize {
    let mut preserved = 0;
    for obj in chunk.objects.iter_mut() {
        let Some(key) = obj.artifact else { continue };
        if ledger.state(key) == Provenance::Created
            && ledger.transition(key, Provenance::NotCreated).is_ok()
        {
            preserved += 1;
        }
        obj.owner = None;
    }
    preserved
}

/// Remove an accepted chunk's contents from the world
///
/// Artifacts still lying on the level return to the pool when `preserve` is
/// set and are retired otherwise. Found artifacts a player dropped here are
/// only touched when retiring.
pub fn wipe_chunk(chunk: &mut Chunk, ledger: &mut ArtifactLedger, preserve: bool) -> WipeSummary {
    let mut summary = WipeSummary::default();

    for obj in chunk.objects.drain(..) {
        let Some(key) = obj.artifact else { continue };
        let target = match (ledger.state(key), preserve) {
            (Provenance::Created, _) | (Provenance::GeneratedInWorld, true) => Provenance::NotCreated,
            (Provenance::GeneratedInWorld, false) | (Provenance::Found, false) => Provenance::Abandoned,
            _ => continue,
        };
        if ledger.transition(key, target).is_ok() {
            match target {
                Provenance::NotCreated => summary.preserved += 1,
                _ => summary.retired += 1,
            }
        }
    }

    for column in &mut chunk.cells {
        for cell in column {
            cell.monster = None;
        }
    }
    chunk.monsters.clear();

    tracing::debug!(
        wpos = %chunk.wpos,
        preserved = summary.preserved,
        retired = summary.retired,
        "chunk wiped"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Loc;
    use crate::object::{ArtifactId, ArtifactKey, Object};
    use crate::player::PlayerId;
    use crate::world::WorldPos;

    fn chunk_with(keys: &[ArtifactKey]) -> Chunk {
        let mut chunk = Chunk::new(WorldPos::new(0, 0, 12), 11, 33);
        for (i, key) in keys.iter().enumerate() {
            chunk.add_object(Object::artifact("relic", Loc::new(2 + i as i32, 2), 12, 30, *key));
        }
        chunk
    }

    fn created(ledger: &mut ArtifactLedger, key: ArtifactKey) {
        ledger.create(key).unwrap();
    }

    #[test]
    fn test_mark_requires_stamp() {
        let key = ArtifactKey::True(ArtifactId(1));
        let mut ledger = ArtifactLedger::default();
        created(&mut ledger, key);
        let mut chunk = chunk_with(&[key]);

        assert_eq!(mark_generated_if_ready(&mut chunk, &mut ledger), 0);
        assert_eq!(ledger.state(key), Provenance::Created);

        chunk.stamp(5);
        assert_eq!(mark_generated_if_ready(&mut chunk, &mut ledger), 1);
        assert_eq!(mark_generated_if_ready(&mut chunk, &mut ledger), 0);
        assert_eq!(ledger.state(key), Provenance::GeneratedInWorld);
    }

    #[test]
    fn test_mark_clears_owner() {
        let key = ArtifactKey::Randomized {
            player: PlayerId(9),
            id: ArtifactId(4),
        };
        let mut ledger = ArtifactLedger::default();
        created(&mut ledger, key);
        let mut chunk = chunk_with(&[key]);
        assert_eq!(chunk.objects[0].owner, Some(PlayerId(9)));

        chunk.stamp(1);
        mark_generated_if_ready(&mut chunk, &mut ledger);
        assert_eq!(chunk.objects[0].owner, None);
    }

    #[test]
    fn test_preserve_on_discard() {
        let key = ArtifactKey::True(ArtifactId(2));
        let mut ledger = ArtifactLedger::default();
        created(&mut ledger, key);
        let mut chunk = chunk_with(&[key]);

        assert_eq!(preserve_on_discard(&mut chunk, &mut ledger), 1);
        assert!(ledger.is_available(key));
    }

    #[test]
    fn test_wipe_preserving() {
        let live = ArtifactKey::True(ArtifactId(1));
        let found = ArtifactKey::True(ArtifactId(2));
        let mut ledger = ArtifactLedger::default();
        for key in [live, found] {
            created(&mut ledger, key);
            ledger.transition(key, Provenance::GeneratedInWorld).unwrap();
        }
        ledger.find(found).unwrap();

        let mut chunk = chunk_with(&[live, found]);
        let summary = wipe_chunk(&mut chunk, &mut ledger, true);
        assert_eq!(summary, WipeSummary { preserved: 1, retired: 0 });
        assert!(ledger.is_available(live));
        assert_eq!(ledger.state(found), Provenance::Found);
        assert!(chunk.objects.is_empty());
    }

    #[test]
    fn test_wipe_retiring() {
        let live = ArtifactKey::True(ArtifactId(1));
        let found = ArtifactKey::True(ArtifactId(2));
        let mut ledger = ArtifactLedger::default();
        for key in [live, found] {
            created(&mut ledger, key);
            ledger.transition(key, Provenance::GeneratedInWorld).unwrap();
        }
        ledger.find(found).unwrap();

        let mut chunk = chunk_with(&[live, found]);
        let summary = wipe_chunk(&mut chunk, &mut ledger, false);
        assert_eq!(summary, WipeSummary { preserved: 0, retired: 2 });
        assert_eq!(ledger.state(live), Provenance::Abandoned);
        assert_eq!(ledger.state(found), Provenance::Abandoned);
    }
}
