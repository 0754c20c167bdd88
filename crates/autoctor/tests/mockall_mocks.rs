//! Generated `mockall` mocks as both registry entries and explicit candidates.

use std::rc::Rc;

use autoctor::{instantiate, Constructible, MockRegistry, Object, TypeDescriptor, TypeKey};
use mockall::automock;

#[automock]
trait Ledger {
    fn balance(&self, account: u32) -> i32;
}

#[automock]
trait RateTable {
    fn rate(&self, currency: &str) -> f64;
}

struct Converter {
    ledger: Rc<dyn Ledger>,
    rates: Rc<dyn RateTable>,
}

impl Converter {
    fn balance_in(&self, account: u32, currency: &str) -> f64 {
        f64::from(self.ledger.balance(account)) * self.rates.rate(currency)
    }
}

impl Constructible for Converter {
    fn descriptor() -> TypeDescriptor<Self> {
        TypeDescriptor::new().with(
            vec![TypeKey::of::<dyn Ledger>(), TypeKey::of::<dyn RateTable>()],
            |args| {
                Ok(Converter {
                    ledger: args.take()?,
                    rates: args.take()?,
                })
            },
        )
    }
}

fn registry() -> MockRegistry {
    let mut mocks = MockRegistry::new();
    mocks
        .register(|| {
            let mut ledger = MockLedger::new();
            ledger.expect_balance().return_const(0_i32);
            Rc::new(ledger) as Rc<dyn Ledger>
        })
        .register(|| {
            let mut rates = MockRateTable::new();
            rates.expect_rate().return_const(1.0_f64);
            Rc::new(rates) as Rc<dyn RateTable>
        });
    mocks
}

#[test]
fn registry_mocks_fill_every_dependency() {
    let converter: Converter = instantiate(&registry(), Vec::<Object>::new()).expect("converter");
    assert!(converter.balance_in(7, "EUR").abs() < f64::EPSILON);
}

#[test]
fn configured_mock_overrides_registry_entry() {
    let mut ledger = MockLedger::new();
    ledger
        .expect_balance()
        .withf(|account| *account == 7)
        .times(1)
        .return_const(250_i32);
    let ledger = Object::builder(ledger)
        .view(|rc| rc as Rc<dyn Ledger>)
        .build();

    let converter: Converter = instantiate(&registry(), [ledger]).expect("converter");
    assert!((converter.balance_in(7, "EUR") - 250.0).abs() < f64::EPSILON);
}
