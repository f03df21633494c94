//! # Broadcast Flows
//!
//! Client stream → `BroadcastHandler` → `Registrar` → `StandardChannel` →
//! `SoloChain` → block, with every component real.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use qc_broadcast::StreamError;
    use qc_registrar::RegistrarConfig;
    use qc_solo::SoloConfig;
    use quantum_telemetry::encode_metrics;
    use shared_types::{ChannelValues, Envelope, Status};

    fn node(batch: usize, writers: &[&str]) -> TestNode {
        let config = RegistrarConfig {
            solo: SoloConfig {
                batch_timeout_ms: 100,
                ..Default::default()
            },
            ..Default::default()
        }
        .with_channel("orders", values(batch, writers, &[]))
        .with_channel("audit", ChannelValues::default());
        TestNode::start(&config).unwrap()
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_submissions_are_answered_and_cut_into_a_block() {
        let node = node(3, &[]);
        let mut blocks = node.channel("orders").unwrap().subscribe();
        let (mut client, task) = node.connect("10.0.0.1:7050");

        for data in [b"a", b"b", b"c"] {
            let resp = client.submit(message("orders", "alice", data).unwrap()).await.unwrap();
            assert_eq!(resp.status, Status::Success);
            assert!(resp.info.is_empty());
        }
        client.close();

        let block = next_block(&mut blocks).await.unwrap();
        assert_eq!(block_data(&block), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_channels_are_ordered_independently() {
        let node = node(1, &[]);
        let mut orders = node.channel("orders").unwrap().subscribe();
        let (mut client, _task) = node.connect("10.0.0.1:7050");

        client.submit(message("orders", "alice", b"o").unwrap()).await.unwrap();
        client.submit(message("audit", "alice", b"x").unwrap()).await.unwrap();

        let block = next_block(&mut orders).await.unwrap();
        assert_eq!(block_data(&block), vec![b"o".to_vec()]);
        assert_eq!(node.channel("audit").unwrap().sequence(), 0);
    }

    // =========================================================================
    // REJECTIONS KEEP THE STREAM OPEN
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_channel_then_valid_message() {
        let node = node(1, &[]);
        let mut blocks = node.channel("orders").unwrap().subscribe();
        let (mut client, task) = node.connect("10.0.0.1:7050");

        let missing = client.submit(message("nope", "alice", b"x").unwrap()).await.unwrap();
        let ok = client.submit(message("orders", "alice", b"y").unwrap()).await.unwrap();
        client.close();

        assert_eq!(missing.status, Status::NotFound);
        assert_eq!(missing.info, "channel does not exist: nope");
        assert_eq!(ok.status, Status::Success);
        assert_eq!(block_data(&next_block(&mut blocks).await.unwrap()), vec![b"y".to_vec()]);
        assert_eq!(task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_policy_violation_is_bad_request_and_never_ordered() {
        let node = node(1, &["bob"]);
        let mut blocks = node.channel("orders").unwrap().subscribe();
        let (mut client, _task) = node.connect("10.0.0.1:7050");

        let denied = client.submit(message("orders", "alice", b"no").unwrap()).await.unwrap();
        let allowed = client.submit(message("orders", "bob", b"yes").unwrap()).await.unwrap();

        assert_eq!(denied.status, Status::BadRequest);
        assert_eq!(denied.info, "creator 'alice' does not satisfy the Writers policy");
        assert_eq!(allowed.status, Status::Success);
        assert_eq!(block_data(&next_block(&mut blocks).await.unwrap()), vec![b"yes".to_vec()]);
    }

    #[tokio::test]
    async fn test_malformed_and_oversized_are_bad_request() {
        let config = RegistrarConfig::default().with_channel(
            "orders",
            ChannelValues {
                max_message_bytes: 256,
                ..Default::default()
            },
        );
        let node = TestNode::start(&config).unwrap();
        let (mut client, _task) = node.connect("10.0.0.1:7050");

        let garbage = Envelope {
            payload: vec![0xff; 3],
            signature: vec![],
        };
        let malformed = client.submit(garbage).await.unwrap();
        let oversized = client
            .submit(message("orders", "alice", &[7u8; 512]).unwrap())
            .await
            .unwrap();

        assert_eq!(malformed.status, Status::BadRequest);
        assert_eq!(oversized.status, Status::BadRequest);
        assert!(oversized.info.contains("exceeds maximum allowed 256 bytes"));
    }

    #[tokio::test]
    async fn test_direct_config_submission_is_bad_request() {
        let node = node(1, &[]);
        let (mut client, _task) = node.connect("10.0.0.1:7050");
        let env = Envelope::build(
            shared_types::HeaderType::Config,
            "orders",
            "alice",
            b"forged".to_vec(),
        )
        .unwrap();

        let resp = client.submit(env).await.unwrap();

        assert_eq!(resp.status, Status::BadRequest);
        assert_eq!(node.channel("orders").unwrap().sequence(), 0);
    }

    #[tokio::test]
    async fn test_halted_channel_is_service_unavailable() {
        let node = node(1, &[]);
        let (mut client, task) = node.connect("10.0.0.1:7050");

        node.shutdown();
        let resp = client.submit(message("orders", "alice", b"late").unwrap()).await.unwrap();
        client.close();

        assert_eq!(resp.status, Status::ServiceUnavailable);
        assert_eq!(resp.info, "channel orders is halted");
        assert_eq!(task.await.unwrap(), Ok(()));
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let node = node(1, &[]);
        let (mut client, task) = node.connect("10.0.0.1:7050");

        client.submit(message("orders", "alice", b"a").unwrap()).await.unwrap();
        client
            .inject_error(StreamError::Transport("connection reset".into()))
            .await
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(StreamError::Transport("connection reset".into()))
        );
        assert!(client.recv_response().await.is_none());
    }

    #[tokio::test]
    async fn test_many_clients_all_messages_ordered_once() {
        let node = node(10, &[]);
        let mut blocks = node.channel("orders").unwrap().subscribe();

        let mut clients = Vec::new();
        for c in 0..5u8 {
            let (mut client, task) = node.connect(&format!("10.0.0.{}:7050", c));
            clients.push(tokio::spawn(async move {
                for m in 0..10u8 {
                    let env = message("orders", "alice", &[c, m]).unwrap();
                    let resp = client.submit(env).await.unwrap();
                    assert_eq!(resp.status, Status::Success);
                }
                client.close();
                task.await.unwrap()
            }));
        }
        for c in clients {
            assert_eq!(c.await.unwrap(), Ok(()));
        }

        let mut seen = Vec::new();
        while seen.len() < 50 {
            let block = next_block(&mut blocks).await.unwrap();
            seen.extend(block_data(&block));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 50);
    }

    #[tokio::test]
    async fn test_metrics_exported_after_traffic() {
        let node = node(1, &[]);
        let (mut client, _task) = node.connect("10.0.0.1:7050");

        client.submit(message("orders", "alice", b"m").unwrap()).await.unwrap();

        let text = encode_metrics().unwrap();
        assert!(text.contains("qc_broadcast_processed_total"));
        assert!(text.contains("qc_broadcast_validate_duration_seconds"));
    }
}
