use monetizer::application::ledger::BalanceLedger;
use monetizer::domain::balance::{Amount, Balance, BalanceCap};
use monetizer::domain::payer::PayerId;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Credit(usize, u64),
    Debit(usize, u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize, 0..500u64).prop_map(|(p, a)| Op::Credit(p, a)),
        (0..3usize, 0..500u64).prop_map(|(p, a)| Op::Debit(p, a)),
    ]
}

proptest! {
    #[test]
    fn balance_stays_within_cap(cap in 1..1_000u64, ops in prop::collection::vec(op(), 0..64)) {
        let ledger = BalanceLedger::new(BalanceCap::Capped(Balance::new(cap)));
        let payers: Vec<PayerId> = ["a", "b", "c"].into_iter().map(PayerId::from).collect();

        for op in ops {
            match op {
                Op::Credit(p, amount) => {
                    ledger.credit(&payers[p], Amount::new(amount));
                }
                Op::Debit(p, price) => {
                    let _ = ledger.debit(&payers[p], Amount::new(price));
                }
            }
            for payer in &payers {
                prop_assert!(ledger.balance_of(payer) <= Balance::new(cap));
            }
        }
    }

    #[test]
    fn ledger_matches_model(ops in prop::collection::vec(op(), 0..64)) {
        let ledger = BalanceLedger::default();
        let payers: Vec<PayerId> = ["a", "b", "c"].into_iter().map(PayerId::from).collect();
        let mut model = [0u64; 3];

        for op in ops {
            match op {
                Op::Credit(p, amount) => {
                    model[p] += amount;
                    prop_assert_eq!(ledger.credit(&payers[p], Amount::new(amount)), Balance::new(model[p]));
                }
                Op::Debit(p, price) => {
                    let result = ledger.debit(&payers[p], Amount::new(price));
                    if model[p] >= price {
                        model[p] -= price;
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }
            for (p, payer) in payers.iter().enumerate() {
                prop_assert_eq!(ledger.balance_of(payer), Balance::new(model[p]));
            }
        }
    }
}
