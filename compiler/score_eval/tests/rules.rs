//! End-to-end rule evaluation over a small order namespace.
//!
//! Builds the kind of namespace a host would populate from a message
//! (an order with repeating fills, rule variables under `$`, and a code set
//! under `^`) and evaluates validation and derivation rules against it.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use score_diagnostic::BufferErrorSink;
use score_eval::{
    buffer_handler, init_tracing, Evaluator, Node, RecordScope, ScopeRef, SymbolResolver, Value,
    ValueData, ValueType,
};
use score_ir::{BinaryOp, Expr, VarRef};

struct Fixture {
    resolver: SymbolResolver,
    order: Rc<RecordScope>,
    variables: Rc<RecordScope>,
}

fn fixture() -> Fixture {
    init_tracing();

    let order = Rc::new(RecordScope::new("NewOrderSingle"));
    order.define_value(Value::new("ClOrdID", ValueData::String("ORD-1".into())));
    order.define_value(Value::new("OrderQty", ValueData::Int(500)));
    order.define_value(Value::parse(ValueType::Decimal, "101.25").unwrap().renamed("Price"));
    order.define_value(Value::new("Side", ValueData::Char('1')));
    order.define_value(
        Value::parse(ValueType::Timestamp, "2017-04-02T12:30:00Z")
            .unwrap()
            .renamed("TransactTime"),
    );
    order.define_value(Value::declared("StopPx", ValueType::Decimal));

    let fills = [("200", "101.20"), ("300", "101.30")]
        .into_iter()
        .map(|(qty, px)| {
            let fill = Rc::new(RecordScope::new("Fills"));
            fill.define_value(Value::parse(ValueType::Int, qty).unwrap().renamed("FillQty"));
            fill.define_value(Value::parse(ValueType::Decimal, px).unwrap().renamed("FillPx"));
            Node::Scope(fill)
        })
        .collect();
    order.define_group("Fills", fills);

    let codes = Rc::new(RecordScope::new("codes"));
    codes.define_value(Value::new("SideBuy", ValueData::Char('1')));
    codes.define_value(Value::new("SideSell", ValueData::Char('2')));

    let variables = Rc::new(RecordScope::new("variables"));

    let mut resolver = SymbolResolver::new();
    resolver.nest_scope(SymbolResolver::THIS, Rc::clone(&order) as ScopeRef);
    resolver.nest_scope(SymbolResolver::VARIABLES, Rc::clone(&variables) as ScopeRef);
    resolver.nest_scope(SymbolResolver::CODES, codes);

    Fixture {
        resolver,
        order,
        variables,
    }
}

fn field(name: &str) -> Expr {
    Expr::variable(VarRef::implicit().field(name))
}

fn fill(index: u32, name: &str) -> Expr {
    Expr::variable(VarRef::implicit().indexed("Fills", index).field(name))
}

#[test]
fn validation_rule_passes() {
    let fx = fixture();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&fx.resolver).error_sink(&sink).build();

    // OrderQty > 0 and Side in {^SideBuy, ^SideSell}
    let rule = Expr::binary_token(
        "and",
        Expr::binary_token(">", field("OrderQty"), Expr::integer("0")).unwrap(),
        Expr::contains(
            field("Side"),
            vec![
                Expr::variable(VarRef::scoped("^").field("SideBuy")),
                Expr::variable(VarRef::scoped("^").field("SideSell")),
            ],
        ),
    )
    .unwrap();

    assert_eq!(evaluator.evaluate(&rule), Some(Value::boolean(true)));
    assert!(sink.is_empty());
}

#[test]
fn derivation_rule_binds_variable() {
    let fx = fixture();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&fx.resolver).error_sink(&sink).build();

    // $Notional = OrderQty * Price
    let rule = Expr::assign(
        VarRef::scoped("$").field("Notional"),
        Expr::binary(BinaryOp::Mul, field("OrderQty"), field("Price")),
    );
    let notional = evaluator.evaluate(&rule).unwrap();
    assert_eq!(notional.name(), "Notional");
    assert_eq!(notional.to_string(), "50625.00");
    assert_eq!(
        fx.variables.lookup("Notional").unwrap().to_string(),
        "50625.00"
    );

    // a second rule can read it back
    let check = Expr::binary_token(
        "ge",
        Expr::variable(VarRef::scoped("$").field("Notional")),
        Expr::decimal("50000"),
    )
    .unwrap();
    assert_eq!(evaluator.evaluate(&check), Some(Value::boolean(true)));
    assert!(sink.is_empty());
}

#[test]
fn repeating_group_arithmetic() {
    let fx = fixture();
    let evaluator = Evaluator::new(&fx.resolver);

    let filled = Expr::binary(BinaryOp::Add, fill(0, "FillQty"), fill(1, "FillQty"));
    let rule = Expr::binary(BinaryOp::Eq, filled, field("OrderQty"));
    assert_eq!(evaluator.evaluate(&rule), Some(Value::boolean(true)));

    let in_band = Expr::range(fill(1, "FillPx"), Expr::decimal("101.00"), field("Price"));
    assert_eq!(evaluator.evaluate(&in_band), Some(Value::boolean(false)));
}

#[test]
fn decimal_precision_is_preserved() {
    let fx = fixture();
    let evaluator = Evaluator::new(&fx.resolver);
    let sum = evaluator
        .evaluate(&Expr::binary(
            BinaryOp::Add,
            Expr::decimal("1.10"),
            Expr::decimal("2.05"),
        ))
        .unwrap();
    assert_eq!(sum.to_string(), "3.15");
    assert_eq!(sum, Value::parse(ValueType::Decimal, "3.15").unwrap());
}

#[test]
fn temporal_rule() {
    let fx = fixture();
    let evaluator = Evaluator::new(&fx.resolver);

    // TransactTime + PT30M < 2017-04-02T13:00:01Z
    let deadline = Expr::binary(
        BinaryOp::Add,
        field("TransactTime"),
        Expr::duration("PT30M"),
    );
    let rule = Expr::binary(BinaryOp::Lt, deadline, Expr::timestamp("2017-04-02T13:00:01Z"));
    assert_eq!(evaluator.evaluate(&rule), Some(Value::boolean(true)));
}

#[test]
fn divide_by_zero_reports_exactly_once() {
    let fx = fixture();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&fx.resolver).error_sink(&sink).build();

    let rule = Expr::binary(BinaryOp::Div, field("OrderQty"), Expr::integer("0"));
    assert_eq!(evaluator.evaluate(&rule), None);
    assert_eq!(
        sink.messages(),
        vec!["Semantic error; division by zero at 'OrderQty/0'".to_string()]
    );
}

#[test]
fn incompatible_assignment_keeps_original() {
    let fx = fixture();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&fx.resolver).error_sink(&sink).build();

    let rule = Expr::assign(VarRef::implicit().field("OrderQty"), Expr::date("2017-04-02"));
    assert_eq!(evaluator.evaluate(&rule), None);
    assert_eq!(sink.len(), 1);
    assert_eq!(fx.order.lookup("OrderQty").unwrap().as_int(), Some(500));
}

#[test]
fn unset_field_is_filled_by_assignment() {
    let fx = fixture();
    let evaluator = Evaluator::new(&fx.resolver);

    assert_eq!(
        evaluator.evaluate(&Expr::exists(VarRef::implicit().field("StopPx"))),
        Some(Value::boolean(true))
    );
    evaluator
        .evaluate(&Expr::assign(
            VarRef::implicit().field("StopPx"),
            Expr::integer("100"),
        ))
        .unwrap();
    let stop = fx.order.lookup("StopPx").unwrap();
    assert_eq!(stop.value_type(), ValueType::Decimal);
    assert_eq!(stop.to_string(), "100");
}

#[test]
fn unary_minus() {
    let fx = fixture();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&fx.resolver).error_sink(&sink).build();

    assert_eq!(
        evaluator.evaluate(&Expr::neg(Expr::integer("5"))),
        Some(Value::int(-5))
    );
    assert!(sink.is_empty());

    let id = evaluator.evaluate(&Expr::neg(field("ClOrdID"))).unwrap();
    assert_eq!(id.as_str(), Some("ORD-1"));
    assert_eq!(sink.len(), 1);
}

#[test]
fn unknown_scope_reports_once() {
    let empty = SymbolResolver::new();
    let sink = BufferErrorSink::new();
    let evaluator = Evaluator::builder(&empty).error_sink(&sink).build();

    let var = VarRef::implicit().field("a").field("b").field("c");
    assert_eq!(evaluator.evaluate(&Expr::variable(var.clone())), None);
    assert_eq!(sink.len(), 1);
    assert!(sink.messages()[0].contains("unknown symbol scope"));

    sink.clear();
    assert_eq!(
        evaluator.evaluate(&Expr::exists(var)),
        Some(Value::boolean(false))
    );
    assert!(sink.is_empty());
}

#[test]
fn trace_names_every_scope_entered() {
    let fx = fixture();
    let handler = buffer_handler();
    let evaluator = Evaluator::builder(&fx.resolver)
        .trace(true)
        .trace_handler(handler.clone())
        .build();

    evaluator.evaluate(&Expr::binary(
        BinaryOp::Add,
        fill(0, "FillQty"),
        Expr::variable(VarRef::scoped("^").field("SideBuy")),
    ));
    assert_eq!(
        handler.get_output(),
        "Current scope NewOrderSingle\nCurrent scope Fills\nCurrent scope codes\n"
    );
}
