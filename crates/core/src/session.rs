use std::collections::BTreeMap;

use remote_protocol::{
    JumpMode, Marker, MarkerId, Region, RegionId, Track, TrackId, TransportState,
};

use crate::navigation::{Navigation, PendingJump, SectionState};

pub const BAR_COUNT_OPTIONS: [u32; 5] = [1, 2, 4, 8, 16];

/// A region presented as a song.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: RegionId,
    pub name: String,
    pub pos: f64,
}

/// What a section click asks the control channel to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpPlan {
    pub section: MarkerId,
    pub target: f64,
    pub deferred: bool,
}

/// Group markers under the regions that contain them.
///
/// Regions are visited by start position; each marker lands in the first
/// region whose `[start, end)` span contains it, and markers outside every
/// region are left out. Sections within a song are ordered by position.
pub fn group_sections(regions: &[Region], markers: &[Marker]) -> BTreeMap<RegionId, Vec<Marker>> {
    let mut sorted_regions: Vec<&Region> = regions.iter().collect();
    sorted_regions.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut sorted_markers: Vec<&Marker> = markers.iter().collect();
    sorted_markers.sort_by(|a, b| a.pos.total_cmp(&b.pos));

    let mut groups: BTreeMap<RegionId, Vec<Marker>> = sorted_regions
        .iter()
        .map(|region| (region.id, Vec::new()))
        .collect();

    for marker in sorted_markers {
        if let Some(region) = sorted_regions.iter().find(|region| region.contains(marker.pos)) {
            groups.entry(region.id).or_default().push(marker.clone());
        }
    }

    groups
}

pub struct Session {
    markers: Vec<Marker>,
    regions: Vec<Region>,
    tracks: Vec<Track>,
    transport: TransportState,
    song_sections: BTreeMap<RegionId, Vec<Marker>>,
    jump_mode: JumpMode,
    bar_count: u32,
    current_song: Option<RegionId>,
    current_section: Option<MarkerId>,
    navigation: Navigation,
}

impl Session {
    pub fn new(jump_mode: JumpMode, bar_count: u32) -> Self {
        Self {
            markers: Vec::new(),
            regions: Vec::new(),
            tracks: Vec::new(),
            transport: TransportState::default(),
            song_sections: BTreeMap::new(),
            jump_mode,
            bar_count: bar_count.max(1),
            current_song: None,
            current_section: None,
            navigation: Navigation::new(),
        }
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        self.recompute_sections();
    }

    pub fn set_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
        self.recompute_sections();
    }

    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    pub fn transport(&self) -> &TransportState {
        &self.transport
    }

    fn recompute_sections(&mut self) {
        self.song_sections = group_sections(&self.regions, &self.markers);

        if self
            .current_song
            .is_some_and(|id| !self.regions.iter().any(|region| region.id == id))
        {
            self.current_song = None;
        }
        if self
            .current_section
            .is_some_and(|id| !self.markers.iter().any(|marker| marker.id == id))
        {
            self.current_section = None;
            self.navigation.clear();
        }
    }

    /// Songs in timeline order.
    pub fn songs(&self) -> Vec<Song> {
        let mut songs: Vec<Song> = self
            .regions
            .iter()
            .map(|region| Song {
                id: region.id,
                name: region.name.clone(),
                pos: region.start,
            })
            .collect();
        songs.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        songs
    }

    pub fn song(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn sections_for_song(&self, id: RegionId) -> &[Marker] {
        self.song_sections.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn song_sections(&self) -> &BTreeMap<RegionId, Vec<Marker>> {
        &self.song_sections
    }

    /// The song whose span contains `pos`, earliest start first.
    pub fn song_at_position(&self, pos: f64) -> Option<&Region> {
        self.regions
            .iter()
            .filter(|region| region.contains(pos))
            .min_by(|a, b| a.start.total_cmp(&b.start))
    }

    /// The last section of the containing song that starts at or before `pos`.
    pub fn section_at_position(&self, pos: f64) -> Option<&Marker> {
        let song = self.song_at_position(pos)?;
        self.sections_for_song(song.id)
            .iter()
            .take_while(|marker| marker.pos <= pos)
            .last()
    }

    pub fn current_song(&self) -> Option<&Region> {
        self.current_song.and_then(|id| self.song(id))
    }

    pub fn current_section(&self) -> Option<&Marker> {
        self.current_section
            .and_then(|id| self.markers.iter().find(|marker| marker.id == id))
    }

    /// Returns false if no such song exists.
    pub fn select_song(&mut self, id: RegionId) -> bool {
        if self.song(id).is_none() {
            return false;
        }
        self.current_song = Some(id);
        true
    }

    pub fn jump_mode(&self) -> JumpMode {
        self.jump_mode
    }

    pub fn set_jump_mode(&mut self, mode: JumpMode) {
        self.jump_mode = mode;
    }

    pub fn bar_count(&self) -> u32 {
        self.bar_count
    }

    pub fn set_bar_count(&mut self, count: u32) {
        self.bar_count = count.max(1);
    }

    pub fn pending_jump(&self) -> Option<PendingJump> {
        self.navigation.pending()
    }

    pub fn active_section(&self) -> Option<MarkerId> {
        self.navigation.active()
    }

    pub fn section_state(&self, id: MarkerId) -> SectionState {
        self.navigation.state_of(id)
    }

    /// Mark a section clicked under the current jump mode.
    ///
    /// Returns `None` for an unknown section.
    pub fn click_section(&mut self, id: MarkerId) -> Option<JumpPlan> {
        let target = self.markers.iter().find(|marker| marker.id == id)?.pos;

        self.current_section = Some(id);
        if let Some(song) = self.song_at_position(target) {
            self.current_song = Some(song.id);
        }

        let deferred = self.navigation.click(id, self.jump_mode);
        Some(JumpPlan {
            section: id,
            target,
            deferred,
        })
    }

    /// Forget the pending jump, after the companion script was told to cancel it.
    pub fn cancel_pending(&mut self) -> Option<PendingJump> {
        self.navigation.cancel()
    }

    /// Adopt a freshly polled transport state.
    ///
    /// Returns the section that playback just reached if it was pending.
    pub fn observe_transport(&mut self, transport: TransportState) -> Option<MarkerId> {
        let pos = transport.pos;
        self.transport = transport;

        let playhead = self.section_at_position(pos).map(|marker| marker.id);
        let arrived = self.navigation.observe(playhead, pos);
        if let Some(id) = arrived {
            self.current_section = Some(id);
            if let Some(song) = self.song_at_position(pos) {
                self.current_song = Some(song.id);
            }
        }
        arrived
    }

    /// The song under the playhead, independent of the selected song.
    pub fn playing_song(&self) -> Option<&Region> {
        self.song_at_position(self.transport.pos)
    }

    /// Roll back a click whose jump request failed.
    pub fn jump_failed(&mut self, id: MarkerId) {
        self.navigation.revert(id);
        if self.current_section == Some(id) {
            self.current_section = self.navigation.active();
        }
    }

    /// Apply a mute change the DAW has acknowledged.
    pub fn set_track_mute(&mut self, id: TrackId, muted: bool) {
        if let Some(track) = self.tracks.iter_mut().find(|track| track.id == id) {
            track.mute = muted;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(JumpMode::default(), 1)
    }
}
