use swc_common::{DUMMY_SP, Span};
use swc_common::comments::{Comment, CommentKind, Comments as _};
use swc_ecma_ast::{CallExpr, Expr, ExprOrSpread, Ident, Module};
use tracing::debug;

use super::shapes::{all_plain, has_property, is_member_call, property_value};
use super::{CallRule, Rule, RuleContext, RuleError, run_call_rule};
use crate::diagnostics::{Diagnostic, DiagnosticKind};

const SIGN_AND_BROADCAST: &str = "signAndBroadcast";
const FEE_PLACEHOLDER: &str = "fee";
const FEE_PLACEHOLDER_NOTE: &str =
    " TODO: Replace with InterchainJS fee object (e.g., { amount: [{ denom, amount }], gas }) ";

/// Unwraps `{ typeUrl, value }` message envelopes in
/// `signingClient.signAndBroadcast(sender, messages, fee, ...)` and swaps the
/// fee for an annotated placeholder.
///
/// The receiver is matched by name, see
/// [`TransformOptions::signing_client_binding`](crate::TransformOptions::signing_client_binding).
pub(crate) struct BroadcastRule;

impl Rule for BroadcastRule {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    fn apply(&mut self, module: &mut Module, cx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        run_call_rule(self, module, cx)
    }
}

impl CallRule for BroadcastRule {
    fn rewrite_call(&mut self, call: &mut CallExpr, cx: &mut RuleContext<'_>) {
        if !is_member_call(call, &cx.options.signing_client_binding, SIGN_AND_BROADCAST)
            || call.args.len() < 3
            || !all_plain(&call.args[..3])
        {
            return;
        }

        let Expr::Array(messages) = &mut *call.args[1].expr else {
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::BroadcastNotRewritten,
                    format!(
                        "{}.{SIGN_AND_BROADCAST} was not rewritten: messages are not an array literal.",
                        cx.options.signing_client_binding
                    ),
                )
                .at(cx.source.locate(call.span)),
            );
            return;
        };

        let mut unwrapped = 0_usize;
        for element in messages.elems.iter_mut().flatten() {
            if let Some(value) = envelope_value(element) {
                element.expr = value;
                unwrapped += 1;
            }
        }

        call.args[2] = ExprOrSpread {
            spread: None,
            expr: Box::new(Expr::Ident(fee_placeholder(cx))),
        };

        debug!(unwrapped, location = ?cx.source.locate(call.span), "rewrote signAndBroadcast call");
        cx.record_rewrite();
    }
}

/// Payload of a `{ typeUrl, value }` envelope.
fn envelope_value(element: &ExprOrSpread) -> Option<Box<Expr>> {
    if element.spread.is_some() {
        return None;
    }
    let Expr::Object(object) = &*element.expr else {
        return None;
    };
    if !has_property(object, "typeUrl") {
        return None;
    }
    property_value(object, "value")
}

/// `fee` preceded by a block comment asking for a real fee object.
fn fee_placeholder(cx: &RuleContext<'_>) -> Ident {
    let span = Span::dummy_with_cmt();
    cx.source.comments.add_leading(
        span.lo,
        Comment {
            kind: CommentKind::Block,
            span: DUMMY_SP,
            text: FEE_PLACEHOLDER_NOTE.into(),
        },
    );
    Ident::new_no_ctxt(FEE_PLACEHOLDER.into(), span)
}
