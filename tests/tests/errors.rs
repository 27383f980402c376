use correlate::{
    provider,
    stmt::{Expr, OrderByExpr},
    CorrelatedAttribute, ContainerKind, Value, ValueRecord,
};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, slot, strings},
    tests, EngineTest,
};

fn team_rows(teams: &[i64]) -> Vec<ValueRecord> {
    teams
        .iter()
        .map(|team| ValueRecord::from_vec(vec![Value::I64(*team)]))
        .collect()
}

async fn second_row_for_a_singular_key_is_non_unique(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();

    let attr = CorrelatedAttribute::new(
        "TeamView.member",
        0,
        fixtures::equals("MemberProvider", "Person", "team_id"),
    )
    .result("name")
    .batch_size(2);

    let err = engine
        .resolve(&view, &attr, team_rows(&[20, 10]))
        .await
        .unwrap_err();

    assert!(err.is_non_unique_result());
    assert_eq!(
        err.to_string(),
        "non-unique result: 'TeamView.member' correlated more than one row to key I64(10)"
    );
}

async fn correlating_two_roots_is_misuse(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();

    let provider = provider::from_fn("TwoRootsProvider", |builder, basis| {
        let person = builder.correlate("Person")?;
        builder.on(Expr::eq(person.field("team_id"), basis));
        builder.correlate("Team")?;
        Ok(())
    });
    let attr = CorrelatedAttribute::new("TeamView.member", 0, provider);

    let err = engine
        .resolve(&view, &attr, team_rows(&[10]))
        .await
        .unwrap_err();

    assert!(err.is_provider_misuse());
    assert!(test.log().is_empty());
}

async fn correlating_no_root_is_misuse(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();

    let provider = provider::from_fn("EmptyProvider", |_, _| Ok(()));
    let attr = CorrelatedAttribute::new("TeamView.member", 0, provider);

    let err = engine
        .resolve(&view, &attr, team_rows(&[10]))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "correlation provider 'EmptyProvider' misused the correlation builder: \
         no root was correlated"
    );
}

fn latest_tag() -> CorrelatedAttribute {
    let provider = provider::from_fn("LatestTagProvider", |builder, basis| {
        let tag = builder.correlate("Tag")?;
        builder
            .on(Expr::eq(tag.field("document_id"), basis))
            .order_by(OrderByExpr::desc(tag.field("id")))
            .limit(1);
        Ok(())
    });

    CorrelatedAttribute::new("DocumentView.latestTags", slot::TAGS, provider)
        .basis(Expr::path("d", "id"))
        .result("name")
        .container(ContainerKind::List)
}

async fn limit_applies_per_key_without_batching(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let rows = engine.resolve(&view, &latest_tag(), rows).await.unwrap();

    assert_eq!(test.log().len(), 4);
    assert_eq!(rows[0][slot::TAGS], strings(&["compilers"]));
    assert_eq!(rows[1][slot::TAGS], strings(&["llvm"]));
    assert_eq!(rows[2][slot::TAGS], strings(&[]));
}

async fn limit_with_batching_is_misuse(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let err = engine
        .resolve(&view, &latest_tag().batch_size(3), rows)
        .await
        .unwrap_err();

    assert!(err.is_provider_misuse());
    assert_eq!(
        err.to_string(),
        "correlation provider 'LatestTagProvider' misused the correlation builder: \
         limit/offset in the correlation for 'DocumentView.latestTags' requires a \
         batch size of 1; configured batch size is 3"
    );
    assert!(test.log().is_empty());
}

async fn query_engine_errors_propagate(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();

    let attr = CorrelatedAttribute::new(
        "TeamView.lead",
        0,
        fixtures::equals("LeadProvider", "Lead", "team_id"),
    );

    let err = engine
        .resolve(&view, &attr, team_rows(&[10]))
        .await
        .unwrap_err();

    assert!(err.is_query_engine());
    assert_eq!(err.to_string(), "query engine error: unknown table 'Lead'");
}

tests!(
    second_row_for_a_singular_key_is_non_unique,
    correlating_two_roots_is_misuse,
    correlating_no_root_is_misuse,
    limit_applies_per_key_without_batching,
    limit_with_batching_is_misuse,
    query_engine_errors_propagate,
);
