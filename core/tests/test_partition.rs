#[cfg(test)]
mod partition_tests {
    use bytes::Bytes;
    use proptest::prelude::*;
    use shardcrypt_core::constants::BLOCK_SIZE;
    use shardcrypt_core::group::{chain_seeds, collect, distribute, GroupError, PartitionPlan};

    #[test]
    fn remainder_goes_to_lowest_ranks() {
        let plan = PartitionPlan::new(10, 4).unwrap();
        let counts: Vec<_> = plan.shards().iter().map(|s| s.block_count).collect();
        let offsets: Vec<_> = plan.shards().iter().map(|s| s.block_offset).collect();
        assert_eq!(counts, vec![3, 3, 2, 2]);
        assert_eq!(offsets, vec![0, 3, 6, 8]);
    }

    #[test]
    fn more_workers_than_blocks() {
        let plan = PartitionPlan::new(2, 5).unwrap();
        let counts: Vec<_> = plan.shards().iter().map(|s| s.block_count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0]);
        assert!(plan.shards()[4].is_empty());
        assert_eq!(plan.shards()[4].byte_range(), 32..32);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(PartitionPlan::new(4, 0), Err(GroupError::EmptyGroup)));
    }

    #[test]
    fn misaligned_byte_len_is_a_protocol_error() {
        assert!(matches!(
            PartitionPlan::for_byte_len(1000, 3),
            Err(GroupError::ProtocolSizeMismatch(_))
        ));
    }

    #[test]
    fn distribute_then_collect_restores_layout() {
        let data: Vec<u8> = (0..(7 * BLOCK_SIZE) as u32).map(|i| i as u8).collect();
        let plan = PartitionPlan::for_byte_len(data.len(), 3).unwrap();
        let source = Bytes::from(data.clone());

        let shards = distribute(&source, &plan).unwrap();
        assert_eq!(shards.iter().map(Bytes::len).collect::<Vec<_>>(), plan.byte_counts());
        assert_eq!(collect(&shards, &plan).unwrap(), data);
    }

    #[test]
    fn collect_rejects_short_shard() {
        let plan = PartitionPlan::new(4, 2).unwrap();
        let shards = vec![vec![0u8; 32], vec![0u8; 16]];
        assert!(matches!(collect(&shards, &plan), Err(GroupError::ProtocolSizeMismatch(_))));
    }

    #[test]
    fn distribute_rejects_wrong_source_len() {
        let plan = PartitionPlan::new(4, 2).unwrap();
        let source = Bytes::from(vec![0u8; 48]);
        assert!(distribute(&source, &plan).is_err());
    }

    #[test]
    fn chain_seeds_are_preceding_blocks() {
        let data: Vec<u8> = (0..5).flat_map(|b| [b as u8; BLOCK_SIZE]).collect();
        let plan = PartitionPlan::for_byte_len(data.len(), 2).unwrap();
        let iv = [0xEEu8; BLOCK_SIZE];

        let seeds = chain_seeds(&data, &plan, &iv);
        assert_eq!(seeds[0], iv);
        // worker 1 starts at block 3, so its seed is block 2
        assert_eq!(seeds[1], [2u8; BLOCK_SIZE]);
    }

    proptest! {
        #[test]
        fn prop_plan_covers_every_block_once(total in 0usize..5000, workers in 1usize..64) {
            let plan = PartitionPlan::new(total, workers).unwrap();
            prop_assert_eq!(plan.shards().len(), workers);

            let mut expected_offset = 0;
            for (i, shard) in plan.shards().iter().enumerate() {
                prop_assert_eq!(shard.worker_index, i);
                prop_assert_eq!(shard.block_offset, expected_offset);
                let want = total / workers + usize::from(i < total % workers);
                prop_assert_eq!(shard.block_count, want);
                expected_offset += shard.block_count;
            }
            prop_assert_eq!(expected_offset, total);
        }
    }
}
