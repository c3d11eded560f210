//! Nullable token ledger: in-memory balances and allowances.

use govpower_types::{Address, ExternalError, TokenLedger};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory fungible token ledger for testing.
///
/// `transfer_from` honours allowances granted with [`NullTokenLedger::approve`],
/// the spender being the custodian that pulls the funds. Failures can be forced
/// with [`NullTokenLedger::reject_transfers`].
pub struct NullTokenLedger {
    balances: Mutex<HashMap<Address, u128>>,
    /// (owner, spender) → remaining allowance.
    allowances: Mutex<HashMap<(Address, Address), u128>>,
    reject: AtomicBool,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            allowances: Mutex::new(HashMap::new()),
            reject: AtomicBool::new(false),
        }
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&self, account: &Address, amount: u128) {
        *self
            .balances
            .lock()
            .unwrap()
            .entry(account.clone())
            .or_default() += amount;
    }

    /// Allow `spender` to pull up to `amount` from `owner`.
    pub fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances
            .lock()
            .unwrap()
            .insert((owner.clone(), spender.clone()), amount);
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .lock()
            .unwrap()
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// While set, every transfer is rejected.
    pub fn reject_transfers(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    fn balance(&self, account: &Address) -> u128 {
        self.balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    fn move_funds(&self, from: &Address, to: &Address, amount: u128) -> Result<(), ExternalError> {
        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(ExternalError::Rejected(format!(
                "{from} holds {available}, cannot send {amount}"
            )));
        }
        balances.insert(from.clone(), available - amount);
        *balances.entry(to.clone()).or_default() += amount;
        Ok(())
    }
}

impl Default for NullTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullTokenLedger {
    fn transfer_from(
        &self,
        payer: &Address,
        custodian: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ExternalError::Rejected("transfers disabled".into()));
        }
        let allowed = self.allowance(payer, custodian);
        if allowed < amount {
            tracing::debug!(payer = %payer, allowed, amount, "null ledger: allowance too low");
            return Err(ExternalError::Rejected(format!(
                "allowance {allowed} below {amount}"
            )));
        }
        self.move_funds(payer, custodian, amount)?;
        self.approve(payer, custodian, allowed - amount);
        Ok(())
    }

    fn transfer(
        &self,
        custodian: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), ExternalError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ExternalError::Rejected("transfers disabled".into()));
        }
        self.move_funds(custodian, recipient, amount)
    }

    fn balance_of(&self, account: &Address) -> Result<u128, ExternalError> {
        Ok(self.balance(account))
    }
}
