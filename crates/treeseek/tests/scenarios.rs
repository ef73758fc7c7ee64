//! End-to-end scenarios over realistic nested data.

use std::sync::Arc;

use serde_json::{json, Value};
use treeseek::{
    Config, ConditionKind, Context, Dir, Number, Param, Picked, Query, QueryError,
};

fn ctx() -> Arc<Context> {
    Arc::new(Context::new())
}

fn groups() -> Value {
    json!([
        {"n": 1, "g": "x"},
        {"n": 2, "g": "y"},
        {"n": 3, "g": "x"},
    ])
}

fn catalog() -> Value {
    json!({
        "store": {
            "name": "north",
            "books": [
                {"title": "Dune", "year": 1965, "price": 9.5, "tags": ["scifi", "classic"], "author": {"name": "Herbert"}},
                {"title": "Emma", "year": 1815, "price": 4, "tags": ["romance", "classic"], "author": {"name": "Austen"}},
                {"title": "Neuromancer", "year": 1984, "price": 12, "tags": ["scifi"], "author": {"name": "Gibson"}},
                {"title": "Solaris", "year": 1961, "price": "7", "tags": [], "author": {"name": "Lem"}},
                {"title": "Ubik", "year": 1969, "price": 6.5, "tags": ["scifi"], "author": {"name": "Dick"}},
            ]
        }
    })
}

fn titles(items: &[Value]) -> Vec<&str> {
    items.iter().filter_map(|b| b["title"].as_str()).collect()
}

// ============================================================================
// Laws on fixed data
// ============================================================================

#[test]
fn empty_data_yields_nothing() {
    for data in [json!([]), json!({})] {
        let q = Query::new(ctx(), &data).unwrap();
        assert!(q.get().unwrap().is_empty());
        assert_eq!(q.count().unwrap(), 0);
        assert_eq!(q.sum().unwrap(), Number::ZERO);

        let q = q.select("*").and_where("n", "=", 1).order_asc("n");
        assert!(q.get().unwrap().is_empty());
        assert_eq!(q.count().unwrap(), 0);
    }
}

#[test]
fn non_empty_object_without_select_is_wrapped() {
    let data = json!({"n": 1});
    let results = Query::new(ctx(), &data).unwrap().get().unwrap();
    assert_eq!(results, vec![data.clone()]);
}

#[test]
fn identity_without_select() {
    let data = groups();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .and_where("n", "=", 99)
        .order_desc("n")
        .get()
        .unwrap();
    assert_eq!(Value::Array(results), data);
}

#[test]
fn where_keeps_original_order() {
    let data = groups();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("*")
        .and_where("g", "=", "x")
        .get()
        .unwrap();
    assert_eq!(results, vec![json!({"n": 1, "g": "x"}), json!({"n": 3, "g": "x"})]);
}

#[test]
fn sort_before_select() {
    let data = groups();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .sort_by([("n", Dir::Desc)])
        .select("*")
        .get()
        .unwrap();
    let ns: Vec<_> = results.iter().map(|i| i["n"].clone()).collect();
    assert_eq!(ns, vec![json!(3), json!(2), json!(1)]);
}

#[test]
fn first_unwraps_only_single_item() {
    let data = catalog();
    let q = Query::new(ctx(), &data).unwrap().select("store.books.*.title");
    assert_eq!(q.count().unwrap(), 5);
    assert_eq!(
        q.first(2).unwrap(),
        Picked::Many(vec![json!("Dune"), json!("Emma")])
    );
    assert_eq!(q.first(1).unwrap(), Picked::One(json!("Dune")));
}

// ============================================================================
// Realistic queries
// ============================================================================

#[test]
fn classic_scifi_before_1970() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books")
        .and_where("year", "<", 1970)
        .and_where("tags.0", "=", "scifi")
        .order_asc("year")
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Dune", "Ubik"]);
}

#[test]
fn price_strings_compare_numerically() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where("price", "<=", 7)
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Emma", "Solaris", "Ubik"]);
}

#[test]
fn sum_of_prices() {
    let data = catalog();
    let total = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*.price")
        .sum()
        .unwrap();
    assert_eq!(total, Number::F64(39.0));
}

#[test]
fn regex_on_nested_field() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where("author.name", "match", "/^[a-h]/i")
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Dune", "Emma", "Neuromancer", "Ubik"]);
}

#[test]
fn deep_wildcard_target() {
    let data = catalog();
    let names = Query::new(ctx(), &data)
        .unwrap()
        .select("store.**.name")
        .get()
        .unwrap();
    assert_eq!(
        names,
        vec![
            json!("Herbert"),
            json!("Austen"),
            json!("Gibson"),
            json!("Lem"),
            json!("Dick")
        ]
    );
}

#[test]
fn empty_tags() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where("tags", "empty", true)
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Solaris"]);
}

#[test]
fn where_in_on_field() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where_in("author", vec![json!("Lem"), json!("Dick")], Some("name"))
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Solaris", "Ubik"]);
}

#[test]
fn where_in_rejects_non_array_haystack() {
    let data = catalog();
    let err = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where_in("title", "Dune", None)
        .get()
        .unwrap_err();
    assert!(matches!(err, QueryError::Condition(_)));
}

#[test]
fn nested_query_on_tags() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .where_nested(|q| Ok(q.and_where("tags.1", "=", "classic")))
        .get()
        .unwrap();
    assert_eq!(titles(&results), vec!["Dune", "Emma"]);
}

#[test]
fn current_item_over_scalars() {
    let data = json!([5, 12, 7, 30]);
    let c = ctx();
    let token = c.current_item().to_string();
    let results = Query::new(c, &data)
        .unwrap()
        .select("*")
        .and_where(token, ">", 6)
        .get()
        .unwrap();
    assert_eq!(results, vec![json!(12), json!(7), json!(30)]);
}

#[test]
fn instance_of_with_custom_type_key() {
    let data = json!([
        {"kind": "Circle", "r": 1},
        {"kind": "Square", "side": 2},
        {"kind": "Circle", "r": 3},
    ]);
    let c = Arc::new(
        Context::builder()
            .config(Config {
                type_key: "kind".to_string(),
                ..Config::default()
            })
            .build(),
    );
    let token = c.current_item().to_string();
    let count = Query::new(c, &data)
        .unwrap()
        .select("*")
        .and_where(token, "instanceOf", "Circle")
        .count()
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn registered_alias_is_callable() {
    let c = Arc::new(
        Context::builder()
            .alias("must", ConditionKind::Where)
            .build(),
    );
    let data = groups();
    let count = Query::new(c, &data)
        .unwrap()
        .select("*")
        .condition("must", vec!["g".into(), "!=".into(), Param::from("x")])
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn paging_with_configured_size() {
    let c = Arc::new(
        Context::builder()
            .config(Config {
                page_size: 2,
                ..Config::default()
            })
            .build(),
    );
    let data = catalog();
    let pages = Query::new(c, &data)
        .unwrap()
        .select("store.books.*.year")
        .paged_default()
        .unwrap();
    assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2, 1]);
}

#[test]
fn each_can_annotate_results() {
    let data = catalog();
    let results = Query::new(ctx(), &data)
        .unwrap()
        .select("store.books.*")
        .and_where("year", ">", 1960)
        .each(|book, index, all| {
            book["rank"] = json!(format!("{}/{}", index + 1, all.len()));
        })
        .unwrap();
    assert_eq!(results[0]["rank"], "1/4");
    assert_eq!(results[3]["rank"], "4/4");
}

#[test]
fn unknown_operator_propagates() {
    let data = groups();
    let err = Query::new(ctx(), &data)
        .unwrap()
        .select("*")
        .and_where("n", "between", 1)
        .get()
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(op) if op == "between"));
}
