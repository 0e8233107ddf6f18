//! Simulated attestation-authority handler.

use async_trait::async_trait;
use ra_latency::{LatencySimulator, Operation, WaitOutcome};
use ra_smart_server::{ConnectionHandler, Disposition, HandlerError, ShutdownSignal};
use ra_telemetry::metric_inc;
use ra_telemetry::metrics::IAS_SIM_RESPONSES;
use ra_transport::Connection;
use ra_wire::{calc_size_str, RpcMessage, RpcWriter};
use tokio::time::Instant;
use tracing::debug;

use crate::error::IasSimError;
use crate::samples::{AttestationReport, REPORT_SIGNATURE, SIGNING_CERT, SIGRL};

/// Category tag for signature revocation list requests.
pub const SIGRL_CATEGORY: &str = "SigRl";
/// Category tag for attestation report requests.
pub const REPORT_CATEGORY: &str = "Report";

/// Answers `SigRl` and `Report` with canned responses after a simulated delay.
///
/// Every request closes its connection afterwards.
pub struct IasSimApp {
    sigrl: RpcMessage,
    report: RpcMessage,
    latency: LatencySimulator,
    shutdown: Option<ShutdownSignal>,
}

impl IasSimApp {
    /// Build the canned responses and take ownership of the latency model.
    pub fn new(latency: LatencySimulator) -> Result<Self, IasSimError> {
        Ok(Self {
            sigrl: build_sigrl()?,
            report: build_report()?,
            latency,
            shutdown: None,
        })
    }

    /// Cut simulated waits short once `shutdown` triggers.
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Canned `SigRl` reply.
    pub fn sigrl_response(&self) -> &RpcMessage {
        &self.sigrl
    }

    /// Canned `Report` reply.
    pub fn report_response(&self) -> &RpcMessage {
        &self.report
    }

    fn canned(&self, operation: Operation) -> &RpcMessage {
        match operation {
            Operation::SigRl => &self.sigrl,
            Operation::Report => &self.report,
        }
    }

    async fn simulate_latency(&self, operation: Operation, started: Instant) -> WaitOutcome {
        let mut sampler = self.latency.sampler();
        match &self.shutdown {
            Some(shutdown) => {
                sampler
                    .wait_remaining(operation, started, shutdown.clone().wait())
                    .await
            }
            None => {
                sampler
                    .wait_remaining(operation, started, std::future::pending())
                    .await
            }
        }
    }
}

#[async_trait]
impl ConnectionHandler for IasSimApp {
    fn name(&self) -> &str {
        "ias-simulator"
    }

    fn categories(&self) -> &[&'static str] {
        &[SIGRL_CATEGORY, REPORT_CATEGORY]
    }

    async fn process(
        &self,
        category: &str,
        connection: &mut Connection,
    ) -> Result<Disposition, HandlerError> {
        let operation = match category {
            SIGRL_CATEGORY => Operation::SigRl,
            REPORT_CATEGORY => Operation::Report,
            other => return Err(HandlerError::Protocol(format!("unexpected category {other}"))),
        };

        let started = Instant::now();
        let request = connection.receive_pack().await?;
        debug!(
            operation = %operation,
            connection = %connection.id(),
            request_len = request.len(),
            "Request received"
        );

        if self.simulate_latency(operation, started).await == WaitOutcome::Cancelled {
            debug!(operation = %operation, "Replying early on terminate");
        }

        connection.send_rpc(self.canned(operation)).await?;
        metric_inc!(IAS_SIM_RESPONSES, &[operation.as_str()]);
        Ok(Disposition::close())
    }
}

fn build_sigrl() -> Result<RpcMessage, IasSimError> {
    let mut writer = RpcWriter::new(calc_size_str(SIGRL.len()), 1)?;
    writer.add_string_arg(SIGRL.len())?.fill(SIGRL)?;
    Ok(writer.seal()?)
}

fn build_report() -> Result<RpcMessage, IasSimError> {
    let report = serde_json::to_vec(&AttestationReport::sample())?;
    let signature = REPORT_SIGNATURE.as_bytes();
    let cert = SIGNING_CERT.as_bytes();

    let mut writer = RpcWriter::new(
        calc_size_str(report.len()) + calc_size_str(signature.len()) + calc_size_str(cert.len()),
        3,
    )?;
    writer.add_string_arg(report.len())?.fill(&report)?;
    writer.add_string_arg(signature.len())?.fill(signature)?;
    writer.add_string_arg(cert.len())?.fill(cert)?;
    Ok(writer.seal()?)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ra_latency::LatencyConfig;
    use ra_smart_server::SmartServer;
    use ra_wire::RpcReader;

    use super::*;

    fn app(config: LatencyConfig) -> IasSimApp {
        IasSimApp::new(LatencySimulator::new(config).unwrap()).unwrap()
    }

    fn pipe() -> (Connection, Connection) {
        let (a, b) = tokio::io::duplex(16 * 1024);
        (Connection::new(a, "server"), Connection::new(b, "client"))
    }

    #[test]
    fn test_canned_responses_carry_size_header() {
        let app = app(LatencyConfig::disabled());
        assert!(app.sigrl_response().has_size_at_front());
        assert_eq!(app.sigrl_response().arg_count(), 1);
        assert_eq!(app.report_response().arg_count(), 3);
    }

    #[tokio::test]
    async fn test_sigrl_reply() {
        let app = app(LatencyConfig::disabled());
        let (mut server, mut client) = pipe();

        client.send_pack(b"00000b1f").await.unwrap();
        let disposition = app.process(SIGRL_CATEGORY, &mut server).await.unwrap();
        assert!(!disposition.keep_alive);

        let reply = client.receive_pack().await.unwrap();
        let mut reader = RpcReader::new(&reply);
        assert_eq!(reader.next_string_arg().unwrap(), SIGRL);
        reader.finish().unwrap();
    }

    #[tokio::test]
    async fn test_report_reply() {
        let app = app(LatencyConfig::disabled());
        let (mut server, mut client) = pipe();

        client.send_pack(br#"{"isvEnclaveQuote":"AAAA"}"#).await.unwrap();
        app.process(REPORT_CATEGORY, &mut server).await.unwrap();

        let reply = client.receive_pack().await.unwrap();
        let mut reader = RpcReader::new(&reply);
        let report: serde_json::Value =
            serde_json::from_slice(reader.next_string_arg().unwrap()).unwrap();
        assert_eq!(report["isvEnclaveQuoteStatus"], "OK");
        assert_eq!(reader.next_string_arg().unwrap(), REPORT_SIGNATURE.as_bytes());
        assert_eq!(reader.next_string_arg().unwrap(), SIGNING_CERT.as_bytes());
        reader.finish().unwrap();
    }

    #[tokio::test]
    async fn test_responses_are_counted_in_exported_metrics() {
        // Already registered by another test in this process is fine
        let _ = ra_telemetry::register_metrics();
        let before = IAS_SIM_RESPONSES.with_label_values(&["sigrl"]).get();

        let app = app(LatencyConfig::disabled());
        let (mut server, mut client) = pipe();
        client.send_pack(b"gid").await.unwrap();
        app.process(SIGRL_CATEGORY, &mut server).await.unwrap();

        assert!(IAS_SIM_RESPONSES.with_label_values(&["sigrl"]).get() >= before + 1.0);
        let text = ra_telemetry::encode_metrics().unwrap();
        assert!(text.contains("ra_ias_sim_responses_total{operation=\"sigrl\"}"));
    }

    #[tokio::test]
    async fn test_foreign_category_is_error() {
        let app = app(LatencyConfig::disabled());
        let (mut server, _client) = pipe();
        let err = app.process("Quote", &mut server).await.unwrap_err();
        assert!(matches!(err, HandlerError::Protocol(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_simulated_latency() {
        let app = app(LatencyConfig::default());
        let (mut server, mut client) = pipe();

        client.send_pack(b"gid").await.unwrap();
        let started = Instant::now();
        app.process(SIGRL_CATEGORY, &mut server).await.unwrap();
        client.receive_pack().await.unwrap();

        if app.latency.is_enabled() {
            assert!(started.elapsed() > Duration::ZERO);
            assert!(started.elapsed() <= app.latency.config().ceiling);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_cuts_wait_short() {
        let server_handle = SmartServer::new();
        let app = app(LatencyConfig::default()).with_shutdown(server_handle.shutdown_signal());
        server_handle.terminate_handle().terminate();
        let (mut server, mut client) = pipe();

        client.send_pack(b"quote").await.unwrap();
        let started = Instant::now();
        app.process(REPORT_CATEGORY, &mut server).await.unwrap();

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(client.receive_pack().await.unwrap(), app.report_response().payload());
    }
}
