//! # Attestation Session Flows
//!
//! One session handler shared by a TCP listener and a local-socket listener,
//! with a whitelist whose reserved self entry is filled at startup.
//!
//! 1. **Trusted peers**: served over either transport, connection reused
//! 2. **Untrusted peers**: rejection status, then close, service untouched
//! 3. **Bootstrap**: the reserved self entry trusts only after population

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ra_session::{AttestationSessionHandler, SessionClient, SessionOutcome};
    use ra_smart_server::{ConnectionHandler, ListenerConfig, SmartServer};
    use ra_transport::Endpoint;
    use ra_whitelist::{WhiteList, SELF_COMPONENT_LABEL};

    use crate::integration::harness::{
        expect_closed, loopback, measurement, ReverseService, Sha256Attestor,
    };

    fn whitelist() -> WhiteList {
        WhiteList::builder()
            .reserve_self()
            .entry("Verifier", measurement(b"verifier-quote"))
            .entry("KeyManager", measurement(b"km-quote"))
            .build()
            .unwrap()
            .populate_reserved(measurement(b"server-quote"))
            .unwrap()
    }

    fn handler(whitelist: WhiteList) -> Arc<dyn ConnectionHandler> {
        Arc::new(
            AttestationSessionHandler::new(
                Arc::new(whitelist),
                Arc::new(Sha256Attestor),
                Arc::new(ReverseService),
            )
            .unwrap(),
        )
    }

    // =============================================================================
    // TEST GROUP 1: Trusted Peers
    // =============================================================================

    #[tokio::test]
    async fn test_trusted_peer_reuses_connection() {
        let mut server = SmartServer::new();
        let tcp = server
            .add_listener(&loopback(), handler(whitelist()), ListenerConfig::default())
            .await
            .unwrap();

        let mut client = SessionClient::connect(&tcp).await.unwrap();
        for request in [b"abc".as_slice(), b"xyz".as_slice()] {
            let mut expected = request.to_vec();
            expected.reverse();
            assert_eq!(
                client
                    .request("Verifier", b"verifier-quote", request)
                    .await
                    .unwrap(),
                SessionOutcome::Response(expected)
            );
        }

        server.terminate().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_network_and_local_listeners_share_one_handler() {
        let dir = tempfile::tempdir().unwrap();
        let shared = handler(whitelist());

        let mut server = SmartServer::new();
        let tcp = server
            .add_listener(&loopback(), Arc::clone(&shared), ListenerConfig::default())
            .await
            .unwrap();
        let local = server
            .add_listener(
                &Endpoint::Local(dir.path().join("ra-session.sock")),
                shared,
                ListenerConfig::default(),
            )
            .await
            .unwrap();
        assert_eq!(server.listener_count(), 2);

        let mut over_tcp = SessionClient::connect(&tcp).await.unwrap();
        let mut over_local = SessionClient::connect(&local).await.unwrap();

        assert_eq!(
            over_tcp.request("KeyManager", b"km-quote", b"12").await.unwrap(),
            SessionOutcome::Response(b"21".to_vec())
        );
        assert_eq!(
            over_local
                .request(SELF_COMPONENT_LABEL, b"server-quote", b"34")
                .await
                .unwrap(),
            SessionOutcome::Response(b"43".to_vec())
        );

        server.terminate().await;
    }

    // =============================================================================
    // TEST GROUP 2: Untrusted Peers
    // =============================================================================

    #[tokio::test]
    async fn test_untrusted_peer_rejected_then_closed() {
        let mut server = SmartServer::new();
        let tcp = server
            .add_listener(&loopback(), handler(whitelist()), ListenerConfig::default())
            .await
            .unwrap();

        let attempts = [
            ("Verifier", b"km-quote".as_slice()),
            ("Stranger", b"verifier-quote".as_slice()),
        ];
        for (component, evidence) in attempts {
            let mut client = SessionClient::connect(&tcp).await.unwrap();
            assert_eq!(
                client.request(component, evidence, b"secret").await.unwrap(),
                SessionOutcome::Rejected
            );
            expect_closed(&mut client.into_inner()).await;
        }

        server.terminate().await;
    }

    // =============================================================================
    // TEST GROUP 3: Bootstrap
    // =============================================================================

    #[tokio::test]
    async fn test_unpopulated_self_entry_never_trusts() {
        let unpopulated = WhiteList::builder()
            .reserve_self()
            .entry("Verifier", measurement(b"verifier-quote"))
            .build()
            .unwrap();

        let mut server = SmartServer::new();
        let tcp = server
            .add_listener(&loopback(), handler(unpopulated), ListenerConfig::default())
            .await
            .unwrap();

        let mut client = SessionClient::connect(&tcp).await.unwrap();
        assert_eq!(
            client
                .request(SELF_COMPONENT_LABEL, b"server-quote", b"x")
                .await
                .unwrap(),
            SessionOutcome::Rejected
        );

        server.terminate().await;
    }
}
