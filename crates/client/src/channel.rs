//! Typed operations over the DAW's control endpoint.

use remote_protocol::{
    Command, JumpMode, Marker, MarkerId, Region, RegionId, ScriptAction, Track, TrackId,
    TransportState, fader_to_engine, parse_markers, parse_regions, parse_tracks, parse_transport,
};
use tracing::{debug, error, info, warn};

use crate::backend::{AnyBackend, Backend};
use crate::error::ClientError;

/// How a jump request ended up being carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The play cursor was moved right away.
    Immediate,
    /// The companion script was asked to jump at its next opportunity.
    Deferred,
    /// A deferred jump could not be handed over, so the cursor was moved right away instead.
    FellBack,
}

impl JumpOutcome {
    /// Whether the cursor has already moved.
    pub fn is_complete(&self) -> bool {
        !matches!(self, JumpOutcome::Deferred)
    }
}

/// What the companion script is assumed to be doing.
///
/// The control endpoint cannot read the external state store back, so this is
/// reconstructed from the locally chosen mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmoothSeekingStatus {
    pub enabled: bool,
    pub mode: SeekMode,
    pub measures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Measures,
    MarkerRegion,
}

impl SeekMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeekMode::Measures => "measures",
            SeekMode::MarkerRegion => "marker/region",
        }
    }
}

impl SmoothSeekingStatus {
    fn disabled() -> Self {
        Self {
            enabled: false,
            mode: SeekMode::Measures,
            measures: 0,
        }
    }
}

pub struct ControlChannel<B = AnyBackend> {
    backend: B,
    script_command: Option<String>,
}

impl<B: Backend> ControlChannel<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            script_command: None,
        }
    }

    /// Command id of the registered companion script. Blank ids count as unset.
    pub fn with_script_command(mut self, command_id: Option<String>) -> Self {
        self.script_command = command_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn script_command(&self) -> Option<&str> {
        self.script_command.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn send(&self, command: &Command) -> Result<String, ClientError> {
        let path = command.path();
        match self.backend.get(&path).await {
            Ok(text) => Ok(text),
            Err(e) => {
                error!(%path, error = %e, "request to DAW failed");
                Err(e)
            }
        }
    }

    pub async fn fetch_markers(&self) -> Result<Vec<Marker>, ClientError> {
        let response = self.send(&Command::ListMarkers).await?;
        let markers = parse_markers(&response);
        info!(count = markers.len(), "loaded markers");
        Ok(markers)
    }

    pub async fn fetch_regions(&self) -> Result<Vec<Region>, ClientError> {
        let response = self.send(&Command::ListRegions).await?;
        let regions = parse_regions(&response);
        info!(count = regions.len(), "loaded regions");
        Ok(regions)
    }

    pub async fn fetch_tracks(&self) -> Result<Vec<Track>, ClientError> {
        let response = self.send(&Command::ListTracks).await?;
        let tracks = parse_tracks(&response);
        debug!(count = tracks.len(), "loaded tracks");
        Ok(tracks)
    }

    pub async fn fetch_transport(&self) -> Result<TransportState, ClientError> {
        let response = self.send(&Command::Transport).await?;
        Ok(parse_transport(&response))
    }

    pub async fn play(&self) -> Result<(), ClientError> {
        info!("play");
        self.send(&Command::Play).await?;
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), ClientError> {
        info!("stop");
        self.send(&Command::Stop).await?;
        Ok(())
    }

    pub async fn seek_to(&self, seconds: f64) -> Result<(), ClientError> {
        debug!(seconds, "seek");
        self.send(&Command::Seek(seconds)).await?;
        Ok(())
    }

    /// Hand a jump to the companion script: target position, then the action
    /// flag, then run the script. Each request completes before the next is
    /// sent because the script reads what the earlier ones wrote.
    ///
    /// Without a script, or if any step fails, the cursor is moved right away
    /// instead. Only a failure of that fallback seek is returned.
    pub async fn request_deferred_jump(&self, target: f64) -> Result<JumpOutcome, ClientError> {
        let Some(script) = self.script_command.clone() else {
            warn!("companion script not configured, seeking immediately");
            self.seek_to(target).await?;
            return Ok(JumpOutcome::FellBack);
        };

        info!(target, "requesting deferred jump");
        match self.hand_over_jump(target, script).await {
            Ok(()) => Ok(JumpOutcome::Deferred),
            Err(e) => {
                warn!(error = %e, "deferred jump failed, seeking immediately");
                self.seek_to(target).await?;
                Ok(JumpOutcome::FellBack)
            }
        }
    }

    async fn hand_over_jump(&self, target: f64, script: String) -> Result<(), ClientError> {
        self.send(&Command::set_deferred_target(target)).await?;
        self.send(&Command::set_action(ScriptAction::RequestJump)).await?;
        self.send(&Command::RunAction(script)).await?;
        Ok(())
    }

    /// Seek or hand over, depending on `mode`.
    pub async fn jump_to(&self, target: f64, mode: JumpMode) -> Result<JumpOutcome, ClientError> {
        if mode.is_deferred() {
            return self.request_deferred_jump(target).await;
        }
        self.seek_to(target).await?;
        Ok(JumpOutcome::Immediate)
    }

    /// Look the marker up in a fresh listing and jump to it.
    ///
    /// Returns `Ok(None)` when no marker has that id.
    pub async fn jump_to_marker(
        &self,
        id: MarkerId,
        mode: JumpMode,
    ) -> Result<Option<JumpOutcome>, ClientError> {
        let markers = self.fetch_markers().await?;
        let Some(marker) = markers.into_iter().find(|marker| marker.id == id) else {
            warn!(%id, "marker not found");
            return Ok(None);
        };

        debug!(name = %marker.name, pos = marker.pos, "jumping to marker");
        self.jump_to(marker.pos, mode).await.map(Some)
    }

    /// Look the region up in a fresh listing and jump to its start.
    pub async fn jump_to_region(
        &self,
        id: RegionId,
        mode: JumpMode,
    ) -> Result<Option<JumpOutcome>, ClientError> {
        let regions = self.fetch_regions().await?;
        let Some(region) = regions.into_iter().find(|region| region.id == id) else {
            warn!(%id, "region not found");
            return Ok(None);
        };

        debug!(name = %region.name, start = region.start, "jumping to region");
        self.jump_to(region.start, mode).await.map(Some)
    }

    /// Ask the script to drop a scheduled jump and fall back to immediate mode.
    ///
    /// Returns false if the request sequence failed; with no script there is
    /// nothing to cancel and this returns true.
    pub async fn cancel_scheduled_jump(&self) -> bool {
        let Some(script) = self.script_command.clone() else {
            debug!("companion script not configured, nothing to cancel");
            return true;
        };

        info!("cancelling scheduled jump");
        let result = async {
            self.send(&Command::set_action(ScriptAction::Cancel)).await?;
            self.send(&Command::set_jump_mode(JumpMode::Immediate)).await?;
            self.send(&Command::RunAction(script)).await?;
            Ok::<_, ClientError>(())
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "cancelling scheduled jump failed");
                false
            }
        }
    }

    /// Push the jump mode (and bar count, for bar mode) to the companion script
    /// and let it reconfigure itself.
    ///
    /// Immediate mode needs no script. Every other mode fails with
    /// [`ClientError::ScriptNotConfigured`] when no script is registered.
    pub async fn configure_jump_mode(
        &self,
        mode: JumpMode,
        bar_count: u32,
    ) -> Result<(), ClientError> {
        let Some(script) = self.script_command.clone() else {
            if mode.is_deferred() {
                warn!(%mode, "companion script not configured");
                return Err(ClientError::ScriptNotConfigured);
            }
            debug!("immediate mode needs no companion script");
            return Ok(());
        };

        info!(%mode, bar_count, "configuring jump mode");
        self.send(&Command::set_jump_mode(mode)).await?;
        if mode == JumpMode::Bar {
            self.send(&Command::set_bar_count(bar_count)).await?;
        }
        self.send(&Command::set_action(ScriptAction::AutoConfig)).await?;
        self.send(&Command::RunAction(script)).await?;
        Ok(())
    }

    /// Ask the script to report its status, then describe it from local
    /// assumptions. Any failure reports smooth seeking as disabled.
    pub async fn smooth_seeking_status(&self, mode: JumpMode, bar_count: u32) -> SmoothSeekingStatus {
        if let Err(e) = self.send(&Command::set_action(ScriptAction::Status)).await {
            warn!(error = %e, "status request failed");
            return SmoothSeekingStatus::disabled();
        }

        let Some(script) = self.script_command.clone() else {
            warn!("companion script not configured");
            return SmoothSeekingStatus::disabled();
        };

        if let Err(e) = self.send(&Command::RunAction(script)).await {
            warn!(error = %e, "status request failed");
            return SmoothSeekingStatus::disabled();
        }

        SmoothSeekingStatus {
            enabled: mode.is_deferred(),
            mode: if mode == JumpMode::Bar {
                SeekMode::Measures
            } else {
                SeekMode::MarkerRegion
            },
            measures: bar_count.max(1),
        }
    }

    /// `fader` is the normalized 0..1 position; it is sent as engine volume.
    pub async fn set_track_volume(&self, id: TrackId, fader: f64) -> Result<(), ClientError> {
        self.send(&Command::SetVolume(id, fader_to_engine(fader))).await?;
        Ok(())
    }

    pub async fn set_track_pan(&self, id: TrackId, pan: f64) -> Result<(), ClientError> {
        self.send(&Command::SetPan(id, pan)).await?;
        Ok(())
    }

    pub async fn set_track_mute(&self, id: TrackId, muted: bool) -> Result<(), ClientError> {
        info!(%id, muted, "set mute");
        self.send(&Command::SetMute(id, muted)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use std::time::Duration;

    const SCRIPT: &str = "_RS7D3C92BC953A9A4AAC";

    fn channel(script: Option<&str>) -> ControlChannel<MockBackend> {
        ControlChannel::new(MockBackend::builtin().with_latency(Duration::ZERO))
            .with_script_command(script.map(str::to_string))
    }

    #[test]
    fn test_blank_script_command_counts_as_unset() {
        assert_eq!(channel(Some("   ")).script_command(), None);
        assert_eq!(channel(Some(SCRIPT)).script_command(), Some(SCRIPT));
    }

    #[tokio::test]
    async fn test_fetches_parse_the_fixture() {
        let channel = channel(None);

        assert_eq!(channel.fetch_markers().await.expect("markers").len(), 10);
        assert_eq!(channel.fetch_regions().await.expect("regions").len(), 3);
        assert_eq!(channel.fetch_tracks().await.expect("tracks").len(), 5);
        assert!(!channel.fetch_transport().await.expect("transport").is_playing());
    }

    #[tokio::test]
    async fn test_mixer_requests() {
        let channel = channel(None);

        channel.set_track_volume(TrackId(1), 1.0).await.expect("vol");
        channel.set_track_pan(TrackId(1), 0.25).await.expect("pan");
        channel.set_track_mute(TrackId(1), true).await.expect("mute");

        assert_eq!(
            channel.backend().requests(),
            vec![
                "/_/SET/TRACK/1/VOL/4.000000".to_string(),
                "/_/SET/TRACK/1/PAN/0.250000".to_string(),
                "/_/SET/TRACK/1/MUTE/1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_request_surfaces_for_direct_actions() {
        let channel = channel(None);
        channel.backend().fail_paths_starting_with("/_/1007");

        let error = channel.play().await.expect_err("play must fail");
        assert!(error.is_transport());
    }

    #[tokio::test]
    async fn test_deferred_jump_sends_three_ordered_requests() {
        let channel = channel(Some(SCRIPT));

        let outcome = channel.request_deferred_jump(96.0).await.expect("jump");

        assert_eq!(outcome, JumpOutcome::Deferred);
        assert_eq!(
            channel.backend().requests(),
            vec![
                "/_/SET/EXTSTATE/LiveRemote/deferred_jump_pos/96".to_string(),
                "/_/SET/EXTSTATE/LiveRemote/smooth_seeking_action/request_jump".to_string(),
                format!("/_/{SCRIPT}"),
            ]
        );
        // The cursor has not moved yet; the script moves it later.
        assert_eq!(channel.backend().play_state().pos, 0.0);
    }

    #[tokio::test]
    async fn test_deferred_jump_without_script_seeks() {
        let channel = channel(None);

        let outcome = channel.request_deferred_jump(36.0).await.expect("jump");

        assert_eq!(outcome, JumpOutcome::FellBack);
        assert_eq!(
            channel.backend().requests(),
            vec!["/_/SET/POS/36;TRANSPORT".to_string()]
        );
    }

    #[tokio::test]
    async fn test_deferred_jump_falls_back_at_every_step() {
        let steps = [
            "/_/SET/EXTSTATE/LiveRemote/deferred_jump_pos",
            "/_/SET/EXTSTATE/LiveRemote/smooth_seeking_action",
            "/_/_RS",
        ];

        for failing in steps {
            let channel = channel(Some(SCRIPT));
            channel.backend().fail_paths_starting_with(failing);

            let outcome = channel.request_deferred_jump(128.0).await.expect("fallback");

            assert_eq!(outcome, JumpOutcome::FellBack, "failing step {failing}");
            assert_eq!(channel.backend().play_state().pos, 128.0);
            assert_eq!(
                channel.backend().requests().last().map(String::as_str),
                Some("/_/SET/POS/128;TRANSPORT")
            );
        }
    }

    #[tokio::test]
    async fn test_failed_fallback_seek_is_returned() {
        let channel = channel(Some(SCRIPT));
        channel.backend().fail_paths_starting_with("/_/");

        assert!(channel.request_deferred_jump(10.0).await.is_err());
    }

    #[tokio::test]
    async fn test_jump_to_marker() {
        let channel = channel(None);

        let outcome = channel
            .jump_to_marker(MarkerId(3), JumpMode::Immediate)
            .await
            .expect("jump");

        assert_eq!(outcome, Some(JumpOutcome::Immediate));
        assert_eq!(channel.backend().play_state().pos, 36.0);
    }

    #[tokio::test]
    async fn test_jump_to_missing_marker_does_nothing() {
        let channel = channel(None);

        let outcome = channel
            .jump_to_marker(MarkerId(999), JumpMode::Immediate)
            .await
            .expect("lookup");

        assert_eq!(outcome, None);
        assert_eq!(channel.backend().requests(), vec!["/_/MARKER".to_string()]);
    }

    #[tokio::test]
    async fn test_jump_to_region_deferred() {
        let channel = channel(Some(SCRIPT));

        let outcome = channel
            .jump_to_region(RegionId(2), JumpMode::RegionEnd)
            .await
            .expect("jump");

        assert_eq!(outcome, Some(JumpOutcome::Deferred));
        assert_eq!(
            channel.backend().ext_state("deferred_jump_pos").as_deref(),
            Some("90")
        );
    }

    #[tokio::test]
    async fn test_cancel_scheduled_jump() {
        let channel = channel(Some(SCRIPT));

        assert!(channel.cancel_scheduled_jump().await);
        assert_eq!(
            channel.backend().ext_state("smooth_seeking_action").as_deref(),
            Some("cancel")
        );
        assert_eq!(
            channel.backend().ext_state("jump_mode").as_deref(),
            Some("immediate")
        );
        assert_eq!(channel.backend().actions(), vec![SCRIPT.to_string()]);
    }

    #[tokio::test]
    async fn test_cancel_reports_failure_without_error() {
        let channel = channel(Some(SCRIPT));
        channel.backend().fail_paths_starting_with("/_/SET/EXTSTATE/LiveRemote/jump_mode");

        assert!(!channel.cancel_scheduled_jump().await);
        assert!(channel.backend().actions().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_without_script_is_a_no_op() {
        let channel = channel(None);

        assert!(channel.cancel_scheduled_jump().await);
        assert!(channel.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn test_configure_bar_mode_writes_bar_count() {
        let channel = channel(Some(SCRIPT));

        channel
            .configure_jump_mode(JumpMode::Bar, 4)
            .await
            .expect("configure");

        assert_eq!(
            channel.backend().requests(),
            vec![
                "/_/SET/EXTSTATE/LiveRemote/jump_mode/bar".to_string(),
                "/_/SET/EXTSTATE/LiveRemote/bar_count/4".to_string(),
                "/_/SET/EXTSTATE/LiveRemote/smooth_seeking_action/auto_config".to_string(),
                format!("/_/{SCRIPT}"),
            ]
        );
    }

    #[tokio::test]
    async fn test_configure_region_end_skips_bar_count() {
        let channel = channel(Some(SCRIPT));

        channel
            .configure_jump_mode(JumpMode::RegionEnd, 4)
            .await
            .expect("configure");

        assert_eq!(channel.backend().requests().len(), 3);
        assert_eq!(channel.backend().ext_state("bar_count"), None);
    }

    #[tokio::test]
    async fn test_configure_without_script() {
        let channel = channel(None);

        assert!(channel.configure_jump_mode(JumpMode::Immediate, 1).await.is_ok());
        assert!(matches!(
            channel.configure_jump_mode(JumpMode::Bar, 1).await,
            Err(ClientError::ScriptNotConfigured)
        ));
        assert!(channel.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn test_configure_surfaces_request_failures() {
        let channel = channel(Some(SCRIPT));
        channel.backend().fail_paths_starting_with(&format!("/_/{SCRIPT}"));

        let error = channel
            .configure_jump_mode(JumpMode::RegionEnd, 1)
            .await
            .expect_err("must fail");
        assert!(error.is_transport());
    }

    #[tokio::test]
    async fn test_smooth_seeking_status_from_local_assumptions() {
        let channel = channel(Some(SCRIPT));

        let status = channel.smooth_seeking_status(JumpMode::Bar, 8).await;
        assert_eq!(
            status,
            SmoothSeekingStatus {
                enabled: true,
                mode: SeekMode::Measures,
                measures: 8,
            }
        );

        let status = channel.smooth_seeking_status(JumpMode::Immediate, 0).await;
        assert!(!status.enabled);
        assert_eq!(status.mode, SeekMode::MarkerRegion);
        assert_eq!(status.measures, 1);
    }

    #[tokio::test]
    async fn test_smooth_seeking_status_without_script() {
        let channel = channel(None);

        let status = channel.smooth_seeking_status(JumpMode::Bar, 2).await;
        assert_eq!(status, SmoothSeekingStatus::disabled());
        assert_eq!(
            channel.backend().ext_state("smooth_seeking_action").as_deref(),
            Some("status")
        );
    }
}
