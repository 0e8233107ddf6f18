//! # IAS Simulator Flows
//!
//! The simulator behind a real TCP listener, driven the way an attestation
//! client would use the real authority:
//!
//! 1. **SigRl**: group id in, one-argument revocation list out
//! 2. **Report**: quote in, report JSON + signature + certificate out
//! 3. **Latency**: replies arrive after the simulated delay, concurrently

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ias_simulator::samples::{REPORT_SIGNATURE, SIGNING_CERT};
    use ias_simulator::{REPORT_CATEGORY, SIGRL_CATEGORY};
    use ra_latency::{DelayProfile, LatencyConfig};
    use ra_smart_server::{ListenerConfig, SmartServer};
    use ra_transport::{Connection, Endpoint};
    use ra_wire::RpcReader;

    use crate::integration::harness::{expect_closed, ias_app, loopback, request};

    async fn start(latency: LatencyConfig) -> (SmartServer, Endpoint) {
        let mut server = SmartServer::new();
        let endpoint = server
            .add_listener(&loopback(), ias_app(latency), ListenerConfig::new(1000, 50))
            .await
            .unwrap();
        (server, endpoint)
    }

    // =============================================================================
    // TEST GROUP 1: Canned Replies
    // =============================================================================

    #[tokio::test]
    async fn test_sigrl_request_gets_revocation_list_and_close() {
        let (server, endpoint) = start(LatencyConfig::disabled()).await;

        let mut client = Connection::connect(&endpoint).await.unwrap();
        let reply = request(&mut client, SIGRL_CATEGORY, b"00000b1f").await;

        let mut reader = RpcReader::new(&reply);
        assert!(reader.next_string_arg().unwrap().is_empty());
        reader.finish().unwrap();
        expect_closed(&mut client).await;

        server.terminate().await;
    }

    #[tokio::test]
    async fn test_report_request_gets_three_part_reply() {
        let (server, endpoint) = start(LatencyConfig::disabled()).await;

        let mut client = Connection::connect(&endpoint).await.unwrap();
        let reply = request(&mut client, REPORT_CATEGORY, br#"{"isvEnclaveQuote":"AAAA"}"#).await;

        let mut reader = RpcReader::new(&reply);
        let report: serde_json::Value =
            serde_json::from_slice(reader.next_string_arg().unwrap()).unwrap();
        assert_eq!(report["isvEnclaveQuoteStatus"], "OK");
        assert_eq!(report["version"], 3);
        assert_eq!(reader.next_string_arg().unwrap(), REPORT_SIGNATURE.as_bytes());
        assert_eq!(reader.next_string_arg().unwrap(), SIGNING_CERT.as_bytes());
        reader.finish().unwrap();

        server.terminate().await;
    }

    #[tokio::test]
    async fn test_unknown_category_gets_nothing() {
        let (server, endpoint) = start(LatencyConfig::disabled()).await;

        let mut client = Connection::connect(&endpoint).await.unwrap();
        client.send_pack(b"Quote").await.unwrap();
        expect_closed(&mut client).await;

        server.terminate().await;
    }

    // =============================================================================
    // TEST GROUP 2: Simulated Latency
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_each_wait_their_own_delay() {
        // 50ms is five standard deviations below the mean
        let latency = LatencyConfig {
            enabled: true,
            ceiling: Duration::from_secs(2),
            sigrl: DelayProfile::from_millis(100, 10),
            report: DelayProfile::from_millis(100, 10),
        };
        let (server, endpoint) = start(latency).await;
        let started = Instant::now();

        let clients: Vec<_> = (0..4)
            .map(|_| {
                let endpoint = endpoint.clone();
                tokio::spawn(async move {
                    let sent = Instant::now();
                    let mut client = Connection::connect(&endpoint).await.unwrap();
                    request(&mut client, REPORT_CATEGORY, b"quote").await;
                    sent.elapsed()
                })
            })
            .collect();

        for client in clients {
            let elapsed = client.await.unwrap();
            assert!(elapsed >= Duration::from_millis(50), "replied after {elapsed:?}");
        }

        // Served side by side, not one after another
        assert!(started.elapsed() < Duration::from_millis(350));
        server.terminate().await;
    }
}
