use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    Bool, CallExpr, Callee, Expr, ExprOrSpread, Ident, IdentName, KeyValueProp, Lit, MemberProp,
    ObjectLit, Prop, PropName, PropOrSpread, Str,
};

/// Returns `(receiver, method)` for calls shaped like `receiver.method(...)`.
pub(crate) fn member_call_names(call: &CallExpr) -> Option<(&str, &str)> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = &**callee else {
        return None;
    };
    let Expr::Ident(receiver) = &*member.obj else {
        return None;
    };
    let MemberProp::Ident(method) = &member.prop else {
        return None;
    };
    Some((&*receiver.sym, &*method.sym))
}

pub(crate) fn is_member_call(call: &CallExpr, receiver: &str, method: &str) -> bool {
    member_call_names(call)
        .is_some_and(|(found_receiver, found_method)| found_receiver == receiver && found_method == method)
}

/// Replaces the receiver identifier of `receiver.method(...)`, keeping its span.
pub(crate) fn rename_receiver(call: &mut CallExpr, name: &str) {
    if let Callee::Expr(callee) = &mut call.callee {
        if let Expr::Member(member) = &mut **callee {
            if let Expr::Ident(receiver) = &mut *member.obj {
                receiver.sym = name.into();
            }
        }
    }
}

/// True when none of `args` is a spread.
pub(crate) fn all_plain(args: &[ExprOrSpread]) -> bool {
    args.iter().all(|arg| arg.spread.is_none())
}

/// Static key of an object property, for `key: v`, `"key": v` and `key`.
pub(crate) fn property_key(prop: &PropOrSpread) -> Option<&str> {
    let PropOrSpread::Prop(prop) = prop else {
        return None;
    };
    match &**prop {
        Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName { sym, .. }),
            ..
        })
        | Prop::Shorthand(Ident { sym, .. }) => Some(&**sym),
        Prop::KeyValue(KeyValueProp {
            key: PropName::Str(key),
            ..
        }) => literal_text(key),
        _ => None,
    }
}

pub(crate) fn has_property(object: &ObjectLit, key: &str) -> bool {
    object
        .props
        .iter()
        .any(|prop| property_key(prop) == Some(key))
}

/// Value expression of property `key`; a shorthand `key` yields the identifier.
pub(crate) fn property_value(object: &ObjectLit, key: &str) -> Option<Box<Expr>> {
    object.props.iter().find_map(|prop| {
        if property_key(prop) != Some(key) {
            return None;
        }
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match &**prop {
            Prop::KeyValue(key_value) => Some(key_value.value.clone()),
            Prop::Shorthand(ident) => Some(Box::new(Expr::Ident(ident.clone()))),
            _ => None,
        }
    })
}

pub(crate) fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: PropName::Ident(IdentName::new(key.into(), DUMMY_SP)),
        value,
    })))
}

pub(crate) fn object(props: Vec<PropOrSpread>) -> Box<Expr> {
    Box::new(Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props,
    }))
}

/// Contents of a string literal as written, without the quotes.
///
/// Reads the raw text, so escapes are not decoded. Every literal this crate
/// builds carries raw text too.
pub(crate) fn literal_text(lit: &Str) -> Option<&str> {
    let raw = lit.raw.as_deref()?;
    raw.get(1..raw.len().checked_sub(1)?)
}

/// A double-quoted string literal node.
pub(crate) fn str_node(value: &str) -> Str {
    let quoted = format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""));
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: Some(quoted.into()),
    }
}

pub(crate) fn string_lit(value: &str) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(str_node(value))))
}

pub(crate) fn bool_lit(value: bool) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Bool(Bool {
        span: DUMMY_SP,
        value,
    })))
}

pub(crate) fn arg(expr: Box<Expr>) -> ExprOrSpread {
    ExprOrSpread { spread: None, expr }
}
