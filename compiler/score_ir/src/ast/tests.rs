use pretty_assertions::assert_eq;

use super::*;

#[test]
fn operator_synonyms_map_to_same_variant() {
    let pairs = [
        ("==", "eq", BinaryOp::Eq),
        ("!=", "ne", BinaryOp::NotEq),
        ("<", "lt", BinaryOp::Lt),
        ("<=", "le", BinaryOp::LtEq),
        (">", "gt", BinaryOp::Gt),
        (">=", "ge", BinaryOp::GtEq),
        ("&&", "and", BinaryOp::And),
        ("||", "or", BinaryOp::Or),
        ("%", "mod", BinaryOp::Mod),
    ];
    for (symbol, word, op) in pairs {
        assert_eq!(BinaryOp::from_token(symbol), Some(op), "{symbol}");
        assert_eq!(BinaryOp::from_token(word), Some(op), "{word}");
    }
}

#[test]
fn unknown_operator_token() {
    assert_eq!(BinaryOp::from_token("<>"), None);
    let err = "**".parse::<BinaryOp>().unwrap_err();
    assert_eq!(err.to_string(), "unknown operator `**`");
}

#[test]
fn unary_tokens() {
    assert_eq!(UnaryOp::from_token("not"), Some(UnaryOp::Not));
    assert_eq!(UnaryOp::from_token("!"), Some(UnaryOp::Not));
    assert_eq!(UnaryOp::from_token("-"), Some(UnaryOp::Neg));
    assert_eq!(UnaryOp::from_token("+"), None);
}

#[test]
fn var_ref_text() {
    let var = VarRef::scoped("this.")
        .field("legs")
        .indexed("fills", 2)
        .field("qty");
    assert_eq!(var.to_string(), "this.legs.fills[2].qty");

    let var = VarRef::scoped("$").field("total");
    assert_eq!(var.to_string(), "$total");

    let var = VarRef::implicit().filtered("parties", "role", Expr::integer("3"));
    assert_eq!(var.to_string(), "parties{role=3}");
}

#[test]
fn expression_text_is_built_from_children() {
    let expr = Expr::binary(BinaryOp::Div, Expr::integer("1"), Expr::integer("0"));
    assert_eq!(expr.text, "1/0");

    let expr = Expr::binary_token("lt", Expr::integer("1"), Expr::integer("2")).unwrap();
    assert_eq!(expr.text, "1 lt 2");

    let expr = Expr::assign(VarRef::scoped("$").field("x"), Expr::string("abc"));
    assert_eq!(expr.text, "$x=\"abc\"");

    let expr = Expr::contains(
        Expr::integer("2"),
        vec![Expr::integer("1"), Expr::integer("2")],
    );
    assert_eq!(expr.text, "2 in {1,2}");
}

#[test]
fn binary_token_keeps_parsed_operator() {
    let symbolic = Expr::binary_token("<=", Expr::integer("1"), Expr::integer("2")).unwrap();
    let keyword = Expr::binary_token("le", Expr::integer("1"), Expr::integer("2")).unwrap();
    assert_eq!(symbolic.kind, keyword.kind);
}
