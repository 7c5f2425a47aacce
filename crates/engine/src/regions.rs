/// Opaque identifier assigned by the waveform view to one caption region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(pub String);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Side-table from caption position to its visual region.
///
/// Region ids are not part of a caption and are never exported. The table is
/// reset whenever the track is replaced; the view re-binds its regions from
/// the new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTable {
    by_position: Vec<Option<RegionId>>,
}

impl RegionTable {
    /// Drops every binding and sizes the table for `record_count` captions.
    pub fn reset(&mut self, record_count: usize) {
        self.by_position.clear();
        self.by_position.resize(record_count, None);
    }

    /// Binds `region` to the caption at `position`, replacing any previous
    /// binding of either side. Returns false for positions outside the table.
    pub fn bind(&mut self, position: usize, region: RegionId) -> bool {
        if position >= self.by_position.len() {
            return false;
        }
        if let Some(previous) = self.position_of(&region) {
            self.by_position[previous] = None;
        }
        self.by_position[position] = Some(region);
        true
    }

    pub fn region_at(&self, position: usize) -> Option<&RegionId> {
        self.by_position.get(position).and_then(Option::as_ref)
    }

    pub fn position_of(&self, region: &RegionId) -> Option<usize> {
        self.by_position
            .iter()
            .position(|bound| bound.as_ref() == Some(region))
    }

    pub fn bound_count(&self) -> usize {
        self.by_position.iter().filter(|bound| bound.is_some()).count()
    }
}
