use remote_client::{AnyBackend, ClientError, ControlChannel, Credentials, HttpBackend, MockBackend};
use tracing::info;

use crate::config::Config;

/// Build the control channel the config describes.
pub fn connect(config: &Config) -> Result<ControlChannel, ClientError> {
    let endpoint = &config.endpoint;

    let backend = if endpoint.mock {
        let mock = match &endpoint.mock_fixture {
            Some(path) => MockBackend::from_file(path)?,
            None => MockBackend::builtin(),
        };
        info!("using mock endpoint");
        AnyBackend::Mock(mock.with_latency(config.mock_latency()))
    } else {
        let credentials = Credentials::from_parts(&endpoint.username, &endpoint.password);
        let http = HttpBackend::new(&endpoint.base_url, credentials)?;
        info!(base_url = http.base_url(), authenticated = http.is_authenticated(), "using HTTP endpoint");
        AnyBackend::Http(http)
    };

    Ok(ControlChannel::new(backend)
        .with_script_command(config.navigation.script_command_id.clone()))
}
