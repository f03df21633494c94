//! # Config Flows
//!
//! Config updates submitted over a broadcast stream: validated against the
//! channel's admins, turned into a `Config` envelope, ordered in a block of its
//! own and applied.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;
    use qc_registrar::RegistrarConfig;
    use qc_solo::SoloConfig;
    use shared_types::{ConfigEnvelope, HeaderType, Status};

    fn node() -> TestNode {
        let config = RegistrarConfig {
            solo: SoloConfig {
                batch_timeout_ms: 100,
                ..Default::default()
            },
            ..Default::default()
        }
        .with_channel("orders", values(10, &["alice", "admin"], &["admin"]));
        TestNode::start(&config).unwrap()
    }

    #[tokio::test]
    async fn test_admin_update_is_ordered_and_applied() {
        let node = node();
        let support = node.channel("orders").unwrap();
        let mut blocks = support.subscribe();
        let (mut client, _task) = node.connect("10.0.0.9:7050");

        let next = values(2, &["alice", "admin", "bob"], &["admin"]);
        let update = config_update("orders", "admin", &["admin"], next.clone()).unwrap();
        let resp = client.submit(update.clone()).await.unwrap();
        assert_eq!(resp.status, Status::Success);

        let block = next_block(&mut blocks).await.unwrap();
        assert_eq!(block.len(), 1);
        let payload = block.envelopes[0].payload().unwrap();
        assert_eq!(payload.header.channel_header.header_type, HeaderType::Config);
        assert_eq!(payload.header.signature_header.creator, "orderer0");
        let config_env = ConfigEnvelope::decode(&payload.data).unwrap();
        assert_eq!(config_env.config.sequence, 1);
        assert_eq!(config_env.config.values, next);
        assert_eq!(config_env.last_update, update);

        assert_eq!(support.sequence(), 1);

        // bob became a writer
        let resp = client.submit(message("orders", "bob", b"hi").unwrap()).await.unwrap();
        assert_eq!(resp.status, Status::Success);
    }

    #[tokio::test]
    async fn test_pending_messages_cut_before_config_block() {
        let node = node();
        let mut blocks = node.channel("orders").unwrap().subscribe();
        let (mut client, _task) = node.connect("10.0.0.9:7050");

        client.submit(message("orders", "alice", b"first").unwrap()).await.unwrap();
        let update =
            config_update("orders", "admin", &["admin"], values(5, &["alice", "admin"], &["admin"]))
                .unwrap();
        client.submit(update).await.unwrap();

        let first = next_block(&mut blocks).await.unwrap();
        let second = next_block(&mut blocks).await.unwrap();
        assert_eq!(block_data(&first), vec![b"first".to_vec()]);
        assert_eq!(second.len(), 1);
        assert_eq!(second.header.previous_hash, first.header.hash());
    }

    #[tokio::test]
    async fn test_update_without_admin_endorsement_is_bad_request() {
        let node = node();
        let (mut client, task) = node.connect("10.0.0.9:7050");

        let update =
            config_update("orders", "alice", &["alice"], values(1, &["alice"], &["alice"])).unwrap();
        let resp = client.submit(update).await.unwrap();
        client.close();

        assert_eq!(resp.status, Status::BadRequest);
        assert!(resp.info.contains("Admins policy"));
        assert_eq!(node.channel("orders").unwrap().sequence(), 0);
        assert_eq!(task.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_update_for_other_channel_is_bad_request() {
        let node = node();
        let (mut client, _task) = node.connect("10.0.0.9:7050");

        let mut update =
            config_update("audit", "admin", &["admin"], values(1, &["admin"], &["admin"])).unwrap();
        // Route it to "orders" while the update itself names "audit"
        let mut payload = update.payload().unwrap();
        payload.header.channel_header.channel_id = "orders".to_string();
        update.payload = payload.encode().unwrap();

        let resp = client.submit(update).await.unwrap();

        assert_eq!(resp.status, Status::BadRequest);
        assert_eq!(node.channel("orders").unwrap().sequence(), 0);
    }

    #[tokio::test]
    async fn test_update_on_halted_channel_is_service_unavailable() {
        let node = node();
        let (mut client, _task) = node.connect("10.0.0.9:7050");
        node.shutdown();

        let update =
            config_update("orders", "admin", &["admin"], values(3, &["admin"], &["admin"])).unwrap();
        let resp = client.submit(update).await.unwrap();

        assert_eq!(resp.status, Status::ServiceUnavailable);
        assert_eq!(resp.info, "channel orders is halted");
        assert_eq!(node.channel("orders").unwrap().sequence(), 0);
    }
}
