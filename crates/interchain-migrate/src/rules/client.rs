use swc_ecma_ast::{CallExpr, Module};
use tracing::debug;

use super::shapes::{all_plain, arg, bool_lit, is_member_call, key_value, object, rename_receiver};
use super::{CallRule, Rule, RuleContext, RuleError, run_call_rule};

const SOURCE_CLIENT: &str = "SigningStargateClient";
const TARGET_CLIENT: &str = "SigningClient";
const CONNECT_WITH_SIGNER: &str = "connectWithSigner";

/// Renames `SigningStargateClient.connectWithSigner(rpc, signer)` and passes
/// explicit broadcast options, which the new client requires.
pub(crate) struct ClientRule;

impl Rule for ClientRule {
    fn name(&self) -> &'static str {
        "client"
    }

    fn apply(&mut self, module: &mut Module, cx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        run_call_rule(self, module, cx)
    }
}

impl CallRule for ClientRule {
    fn rewrite_call(&mut self, call: &mut CallExpr, cx: &mut RuleContext<'_>) {
        if !is_member_call(call, SOURCE_CLIENT, CONNECT_WITH_SIGNER)
            || call.args.len() != 2
            || !all_plain(&call.args)
        {
            return;
        }

        rename_receiver(call, TARGET_CLIENT);
        call.args.push(arg(object(vec![key_value(
            "broadcast",
            object(vec![
                key_value("checkTx", bool_lit(true)),
                key_value("deliverTx", bool_lit(true)),
            ]),
        )])));

        debug!(location = ?cx.source.locate(call.span), "rewrote client construction");
        cx.record_rewrite();
    }
}
