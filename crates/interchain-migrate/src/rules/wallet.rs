use swc_common::DUMMY_SP;
use swc_ecma_ast::{ArrayLit, CallExpr, Expr, Module};
use tracing::debug;

use super::shapes::{
    arg, is_member_call, key_value, object, property_key, property_value, rename_receiver, string_lit,
};
use super::{CallRule, Rule, RuleContext, RuleError, run_call_rule};
use crate::diagnostics::{Diagnostic, DiagnosticKind};

const SOURCE_WALLET: &str = "DirectSecp256k1HdWallet";
const TARGET_WALLET: &str = "Secp256k1HDWallet";
const FROM_MNEMONIC: &str = "fromMnemonic";

/// Cosmos Hub account derivation path used for every migrated wallet.
const DEFAULT_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// `DirectSecp256k1HdWallet.fromMnemonic(m, { prefix })` to
/// `Secp256k1HDWallet.fromMnemonic(m, [{ prefix, hdPath }])`.
pub(crate) struct WalletRule;

impl Rule for WalletRule {
    fn name(&self) -> &'static str {
        "wallet"
    }

    fn apply(&mut self, module: &mut Module, cx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        run_call_rule(self, module, cx)
    }
}

impl CallRule for WalletRule {
    fn rewrite_call(&mut self, call: &mut CallExpr, cx: &mut RuleContext<'_>) {
        if !is_member_call(call, SOURCE_WALLET, FROM_MNEMONIC) || call.args.len() < 2 {
            return;
        }
        if call.args[..2].iter().any(|arg| arg.spread.is_some()) {
            return;
        }
        let Expr::Object(options) = &*call.args[1].expr else {
            return;
        };
        let Some(prefix) = property_value(options, "prefix") else {
            return;
        };

        let dropped: Vec<String> = options
            .props
            .iter()
            .filter_map(|prop| match property_key(prop) {
                Some("prefix") => None,
                Some(key) => Some(key.to_owned()),
                None => Some("...".to_owned()),
            })
            .collect();
        if !dropped.is_empty() {
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::DroppedWalletOption,
                    format!(
                        "Wallet options [{}] were dropped; only 'prefix' is carried over to {TARGET_WALLET}.",
                        dropped.join(", ")
                    ),
                )
                .at(cx.source.locate(call.span)),
            );
        }

        let hd_options = object(vec![
            key_value("prefix", prefix),
            key_value("hdPath", string_lit(DEFAULT_HD_PATH)),
        ]);
        call.args.truncate(1);
        call.args.push(arg(Box::new(Expr::Array(ArrayLit {
            span: DUMMY_SP,
            elems: vec![Some(arg(hd_options))],
        }))));
        rename_receiver(call, TARGET_WALLET);

        debug!(location = ?cx.source.locate(call.span), "rewrote wallet construction");
        cx.record_rewrite();
    }
}
