#[cfg(test)]
mod group_tests {
    use bytes::Bytes;
    use shardcrypt_core::group::{GroupError, LocalGroup, PartitionPlan, ShardMessage};

    #[test]
    fn empty_group_is_rejected() {
        assert!(matches!(LocalGroup::new(0), Err(GroupError::EmptyGroup)));
    }

    #[test]
    fn broadcast_scatter_gather_round_trip() {
        let group = LocalGroup::new(4).unwrap();
        let data: Vec<u8> = (0..160u8).collect();

        let results = group.run(|h| -> Result<Option<Vec<u8>>, GroupError> {
            let announced = h.is_coordinator().then_some(data.len() as u64);
            let size = h.broadcast_size(announced)? as usize;
            let plan = PartitionPlan::for_byte_len(size, h.size())?;

            let parts = h.is_coordinator().then(|| {
                let source = Bytes::from(data.clone());
                plan.shards()
                    .iter()
                    .map(|s| ShardMessage::new(source.slice(s.byte_range())))
                    .collect()
            });
            let shard = h.scatter(parts)?;
            assert_eq!(shard.bytes.len(), plan.shards()[h.rank()].byte_len());

            // every worker flips its bytes
            let local: Vec<u8> = shard.bytes.iter().map(|b| !b).collect();
            h.gather(local, &plan)
        });

        let expected: Vec<u8> = data.iter().map(|b| !b).collect();
        let mut results = results.into_iter();
        assert_eq!(results.next().unwrap().unwrap(), Some(expected));
        for r in results {
            assert_eq!(r.unwrap(), None);
        }
    }

    #[test]
    fn failing_worker_aborts_the_coordinator() {
        let group = LocalGroup::new(3).unwrap();

        let results = group.run(|h| -> Result<u64, GroupError> {
            let size = h.broadcast_size(h.is_coordinator().then_some(48))?;
            if h.rank() == 1 {
                return Err(GroupError::InvalidCollective("injected failure".into()));
            }
            let plan = PartitionPlan::for_byte_len(size as usize, h.size())?;
            h.gather(vec![0u8; plan.shards()[h.rank()].byte_len()], &plan)?;
            Ok(size)
        });

        match &results[0] {
            Err(GroupError::Aborted { origin, reason }) => {
                assert_eq!(*origin, 1);
                assert!(reason.contains("injected failure"));
            }
            other => panic!("coordinator should be aborted, got {other:?}"),
        }
        assert!(matches!(results[1], Err(GroupError::InvalidCollective(_))));
    }

    #[test]
    fn panicking_worker_aborts_every_peer() {
        let group = LocalGroup::new(4).unwrap();

        let results = group.run(|h| -> Result<(), GroupError> {
            if h.rank() == 2 {
                panic!("injected panic");
            }
            // Peers wait for a broadcast that the coordinator never sends.
            if h.is_coordinator() {
                let _ = h.recv_chain_seed(3)?;
            } else {
                h.broadcast_size(None)?;
            }
            Ok(())
        });

        assert!(matches!(results[2], Err(GroupError::WorkerPanicked { rank: 2 })));
        for rank in [0, 1, 3] {
            assert!(
                matches!(results[rank], Err(GroupError::Aborted { origin: 2, .. })),
                "rank {rank}: {:?}",
                results[rank]
            );
        }
    }

    #[test]
    fn silent_peer_is_reported_as_disconnected() {
        let group = LocalGroup::new(2).unwrap();

        let results = group.run(|h| -> Result<(), GroupError> {
            if h.is_coordinator() {
                h.recv_chain_seed(1)?;
            }
            Ok(())
        });

        assert!(matches!(results[0], Err(GroupError::Disconnected { rank: 0, .. })));
        assert!(results[1].is_ok());
    }

    #[test]
    fn chain_seed_relay_preserves_rank_order() {
        let group = LocalGroup::new(5).unwrap();

        let results = group.run(|h| -> Result<[u8; 16], GroupError> {
            let rank = h.rank();
            let mut seed = if rank == 0 { [0u8; 16] } else { h.recv_chain_seed(rank - 1)? };
            seed[rank] = rank as u8 + 1;
            if rank + 1 < h.size() {
                h.send_chain_seed(rank + 1, seed)?;
            }
            Ok(seed)
        });

        let last = results[4].as_ref().unwrap();
        assert_eq!(&last[..5], &[1, 2, 3, 4, 5]);
    }
}
