//! # Dispatch Flows
//!
//! Several listeners on one server, each bound to its own handler:
//!
//! 1. **Handler binding**: a category is only served by the listener whose
//!    handler declared it
//! 2. **Sequencing**: requests on one kept-alive connection run in order, even
//!    with a single worker

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ias_simulator::SIGRL_CATEGORY;
    use ra_latency::LatencyConfig;
    use ra_session::{
        AttestationSessionHandler, SessionClient, SessionOutcome, RA_SESSION_CATEGORY,
    };
    use ra_smart_server::{ConnectionHandler, ListenerConfig, SmartServer};
    use ra_transport::{Connection, Endpoint};
    use ra_whitelist::WhiteList;

    use crate::integration::harness::{
        expect_closed, ias_app, loopback, measurement, request, ReverseService, Sha256Attestor,
    };

    fn session_handler() -> Arc<dyn ConnectionHandler> {
        let whitelist = WhiteList::builder()
            .entry("Verifier", measurement(b"verifier-quote"))
            .build()
            .unwrap();
        Arc::new(
            AttestationSessionHandler::new(
                Arc::new(whitelist),
                Arc::new(Sha256Attestor),
                Arc::new(ReverseService),
            )
            .unwrap(),
        )
    }

    async fn two_listeners(config: ListenerConfig) -> (SmartServer, Endpoint, Endpoint) {
        let mut server = SmartServer::new();
        let ias = server
            .add_listener(&loopback(), ias_app(LatencyConfig::disabled()), config)
            .await
            .unwrap();
        let session = server
            .add_listener(&loopback(), session_handler(), config)
            .await
            .unwrap();
        (server, ias, session)
    }

    // =============================================================================
    // TEST GROUP 1: Handler Binding
    // =============================================================================

    #[tokio::test]
    async fn test_category_only_served_by_its_own_listener() {
        let (server, ias, session) = two_listeners(ListenerConfig::default()).await;
        assert_eq!(server.listener_count(), 2);

        let mut wrong = Connection::connect(&ias).await.unwrap();
        wrong.send_pack(RA_SESSION_CATEGORY.as_bytes()).await.unwrap();
        expect_closed(&mut wrong).await;

        let mut wrong = Connection::connect(&session).await.unwrap();
        wrong.send_pack(SIGRL_CATEGORY.as_bytes()).await.unwrap();
        expect_closed(&mut wrong).await;

        let mut right = Connection::connect(&ias).await.unwrap();
        assert!(!request(&mut right, SIGRL_CATEGORY, b"gid").await.is_empty());

        let mut right = SessionClient::connect(&session).await.unwrap();
        assert_eq!(
            right
                .request("Verifier", b"verifier-quote", b"ok")
                .await
                .unwrap(),
            SessionOutcome::Response(b"ko".to_vec())
        );

        server.terminate().await;
    }

    #[tokio::test]
    async fn test_listeners_keep_separate_pools() {
        let (server, ias, session) = two_listeners(ListenerConfig::new(4, 2)).await;

        let mut client = SessionClient::connect(&session).await.unwrap();
        client
            .request("Verifier", b"verifier-quote", b"abc")
            .await
            .unwrap();

        let ias_stats = server.pool_stats(&ias).unwrap();
        assert_eq!(ias_stats.capacity, 4);
        assert_eq!(ias_stats.idle + ias_stats.active, 0);

        server.terminate().await;
    }

    // =============================================================================
    // TEST GROUP 2: Sequencing
    // =============================================================================

    #[tokio::test]
    async fn test_single_worker_serves_kept_alive_requests_in_order() {
        let (server, _ias, session) = two_listeners(ListenerConfig::new(4, 1)).await;

        let mut client = SessionClient::connect(&session).await.unwrap();
        for round in 0u8..5 {
            let payload = [round, round + 1, round + 2];
            let mut expected = payload.to_vec();
            expected.reverse();
            assert_eq!(
                client
                    .request("Verifier", b"verifier-quote", &payload)
                    .await
                    .unwrap(),
                SessionOutcome::Response(expected)
            );
        }

        server.terminate().await;
    }
}
