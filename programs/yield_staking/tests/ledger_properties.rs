mod common;

use anchor_lang::prelude::*;
use proptest::prelude::*;

use common::*;
use yield_staking::engine::{RewardVault, StakeLedger};

#[derive(Clone, Debug)]
enum Op {
    Stake { who: usize, amount: u64 },
    Withdraw { who: usize, percent: u64 },
    Claim { who: usize },
    Fund { amount: u64 },
    Advance { seconds: i64 },
    Accrue { bps: u128 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u64..=50 * SOL).prop_map(|(who, amount)| Op::Stake { who, amount }),
        (0usize..3, 1u64..=100).prop_map(|(who, percent)| Op::Withdraw { who, percent }),
        (0usize..3).prop_map(|who| Op::Claim { who }),
        (1u64..=10 * SOL).prop_map(|amount| Op::Fund { amount }),
        (0i64..=30 * 86_400).prop_map(|seconds| Op::Advance { seconds }),
        (1u128..=500).prop_map(|bps| Op::Accrue { bps }),
    ]
}

proptest! {
    /// Whatever sequence of calls succeeds or fails, the books stay balanced:
    /// totals match the records, each principal is exactly what was staked
    /// minus what was withdrawn, reward units are never created or lost, and
    /// checkpoints never move back. The yield source's rate may rise between
    /// calls.
    #[test]
    fn prop_books_stay_balanced(ops in prop::collection::vec(op(), 1..60)) {
        let mut service = service();
        let accounts = [Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
        let mut checkpoints = [0i64; 3];
        let mut staked = [0u64; 3];
        let mut withdrawn = [0u64; 3];
        let mut funded = 0u64;
        let mut now = START;

        for op in ops {
            match op {
                Op::Stake { who, amount } => {
                    if let Ok(receipt) = service.stake(&accounts[who], amount, now) {
                        staked[who] += receipt.amount;
                    }
                }
                Op::Withdraw { who, percent } => {
                    let principal = service.record(&accounts[who]).unwrap().principal;
                    let amount = principal / 100 * percent;
                    if let Ok(receipt) = service.withdraw(&accounts[who], amount, now) {
                        withdrawn[who] += receipt.amount;
                    }
                }
                Op::Claim { who } => {
                    let _ = service.claim_rewards(&accounts[who], now);
                }
                Op::Fund { amount } => {
                    if service.fund_rewards(amount).is_ok() {
                        funded += amount;
                    }
                }
                Op::Advance { seconds } => {
                    now += seconds;
                    observe(&mut service, now);
                }
                Op::Accrue { bps } => {
                    let source = service.yield_source_mut();
                    source.rate = source.rate * (10_000 + bps) / 10_000;
                }
            }

            let mut principal_sum = 0u64;
            let mut proxy_sum = 0u64;
            for (index, account) in accounts.iter().enumerate() {
                let record = service.record(account).unwrap();
                principal_sum += record.principal;
                proxy_sum += record.proxy_balance;

                prop_assert_eq!(record.principal, staked[index] - withdrawn[index]);

                prop_assert!(record.last_accrual_timestamp >= checkpoints[index]);
                prop_assert!(record.last_accrual_timestamp <= now);
                checkpoints[index] = record.last_accrual_timestamp;
            }

            prop_assert_eq!(service.total_staked(), principal_sum);
            prop_assert_eq!(service.ledger().total_proxy(), proxy_sum);

            let transfers = service.transfers();
            prop_assert!(transfers.total_accepted() >= principal_sum);

            let vault = service.vault();
            prop_assert_eq!(vault.balance() + vault.total_paid(), funded);
            prop_assert_eq!(vault.total_paid(), transfers.total_paid());
        }
    }
}
