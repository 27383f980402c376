use correlate::{
    provider,
    stmt::{Expr, Query},
    CorrelatedAttribute, ContainerKind, Value, ViewContext, ViewType,
};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, slot, strings},
    tests, EngineTest,
};

fn has_subquery(expr: &Expr) -> bool {
    match expr {
        Expr::InSubquery(_) => true,
        Expr::And(expr) => expr.operands.iter().any(has_subquery),
        _ => false,
    }
}

fn filters_by_subquery(query: &Query) -> bool {
    query.filter.as_ref().is_some_and(has_subquery)
}

async fn collection_is_resolved_with_one_query(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let rows = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 1);

    let query = test.log().pop().unwrap();
    assert_eq!(query.joins.len(), 1);
    assert!(query.order_by.is_empty());
    assert!(query.limit.is_none());

    assert_eq!(rows[0][slot::TAGS], strings(&["rust", "compilers"]));
    assert_eq!(rows[1][slot::TAGS], strings(&["llvm", "llvm"]));
    assert_eq!(rows[2][slot::TAGS], strings(&[]));
    assert_eq!(rows[3][slot::TAGS], strings(&[]));
}

async fn shared_key_counts_rows_joined_through_its_first_row(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    // Documents 1 to 3 share team 10, so its name is joined three times.
    let rows = engine
        .resolve(&view, &fixtures::team_name().subselect(), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 1);
    assert_eq!(rows[0][slot::TEAM], Value::from("Compilers"));
    assert_eq!(rows[2][slot::TEAM], Value::from("Compilers"));
    assert_eq!(rows[3][slot::TEAM], Value::from("Kernels"));

    // A shared key still gets one element per correlated row
    let attr = CorrelatedAttribute::new(
        "DocumentView.teamMembers",
        slot::TEAM,
        fixtures::equals("TeamMembersProvider", "Person", "team_id"),
    )
    .basis(Expr::path("d", "team_id"))
    .result("name")
    .container(ContainerKind::List)
    .subselect();

    let rows = engine
        .resolve(&view, &attr, test.primary_rows(&view).await)
        .await
        .unwrap();

    assert_eq!(rows[1][slot::TEAM], strings(&["Ada", "Grace"]));
    assert_eq!(rows[3][slot::TEAM], strings(&["Linus"]));
}

async fn view_root_correlation_groups_by_root_id(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let rows = engine
        .resolve(&view, &fixtures::team_documents().subselect(), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 1);
    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], strings(&["Codegen", "Linking"]));
    assert_eq!(rows[1][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Linking"]));
    assert_eq!(rows[2][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Codegen"]));
    assert_eq!(rows[3][slot::TEAM_DOCUMENTS], strings(&[]));
}

async fn limited_primary_query(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", slot::ID))
        .primary(fixtures::documents().limit(2));
    let rows = test.primary_rows(&view).await;
    assert_eq!(rows.len(), 2);

    let rows = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap();

    let query = test.log().pop().unwrap();

    // Without support for limits in subqueries the limit is dropped and the
    // rows of other documents are ignored.
    assert_eq!(
        filters_by_subquery(&query),
        test.capability().subquery_limit
    );

    assert_eq!(rows[0][slot::TAGS], strings(&["rust", "compilers"]));
    assert_eq!(rows[1][slot::TAGS], strings(&["llvm", "llvm"]));

    // An offset alone drops rows too
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", slot::ID))
        .primary(fixtures::documents().offset(1));
    let rows = test.primary_rows(&view).await;
    assert_eq!(rows.len(), 3);

    let rows = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap();

    let query = test.log().pop().unwrap();
    assert_eq!(
        filters_by_subquery(&query),
        test.capability().subquery_limit
    );

    assert_eq!(rows[0][slot::TAGS], strings(&["llvm", "llvm"]));
    assert_eq!(rows[1][slot::TAGS], strings(&[]));
    assert_eq!(rows[2][slot::TAGS], strings(&[]));
}

/// Documents whose owner is embedded as the view's parent.
fn owner_view() -> ViewContext {
    fixtures::document_view().embedding_view(ViewType::new("OwnerView", "d").id("owner_id", slot::OWNER))
}

async fn embedding_view_correlation_groups_by_its_id(test: &mut EngineTest) {
    let engine = test.engine();
    let view = owner_view();
    let rows = test.primary_rows(&view).await;

    let provider = provider::from_fn("TeammatesProvider", |builder, basis| {
        let person = builder.correlate("Person")?;
        let owner = builder.embedding_view();
        builder
            .on(Expr::eq(person.field("team_id"), basis))
            .on(Expr::ne(person.field("id"), owner));
        Ok(())
    });
    let attr = CorrelatedAttribute::new("OwnerView.teammates", slot::TEAM, provider)
        .basis(Expr::path("d", "team_id"))
        .result("name")
        .container(ContainerKind::List)
        .subselect();

    let rows = engine.resolve(&view, &attr, rows).await.unwrap();

    assert_eq!(test.log().len(), 1);
    assert_eq!(
        test.log().pop().unwrap().select[..3],
        [
            Expr::path("d", "id"),
            Expr::path("d", "owner_id"),
            Expr::path("d", "team_id"),
        ]
    );

    assert_eq!(rows[0][slot::TEAM], strings(&["Grace"]));
    assert_eq!(rows[1][slot::TEAM], strings(&["Ada"]));
    assert_eq!(rows[2][slot::TEAM], strings(&["Grace"]));
    assert_eq!(rows[3][slot::TEAM], strings(&[]));
}

async fn embedding_view_wins_over_view_root(test: &mut EngineTest) {
    let engine = test.engine();
    let view = owner_view();
    let rows = test.primary_rows(&view).await;

    let provider = provider::from_fn("ForeignTeamDocumentsProvider", |builder, basis| {
        let document = builder.correlate("Document")?;
        let root = builder.view_root();
        let owner = builder.embedding_view();
        builder
            .on(Expr::eq(document.field("team_id"), basis))
            .on(Expr::ne(document.field("id"), root))
            .on(Expr::ne(document.field("owner_id"), owner));
        Ok(())
    });
    let attr = CorrelatedAttribute::new("OwnerView.foreignDocuments", slot::TEAM_DOCUMENTS, provider)
        .basis(Expr::path("d", "team_id"))
        .result("title")
        .container(ContainerKind::List)
        .subselect();

    let rows = engine.resolve(&view, &attr, rows).await.unwrap();

    // Documents 1 and 3 share owner and team, so they share the rows joined
    // through document 1.
    assert_eq!(test.log().len(), 1);
    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], strings(&["Codegen"]));
    assert_eq!(rows[1][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Linking"]));
    assert_eq!(rows[2][slot::TEAM_DOCUMENTS], strings(&["Codegen"]));
    assert_eq!(rows[3][slot::TEAM_DOCUMENTS], strings(&[]));
}

async fn parent_slot_outside_the_rows_is_invalid_configuration(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", 42))
        .primary(fixtures::documents());
    let rows = test.primary_rows(&view).await;

    let err = engine
        .resolve(&view, &fixtures::team_documents().subselect(), rows)
        .await
        .unwrap_err();

    assert!(err.is_invalid_configuration());
    assert!(test.log().is_empty());
}

async fn null_keys_issue_no_query(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let mut rows = test.primary_rows(&view).await;
    for row in &mut rows {
        row[slot::TAGS] = Value::Null;
    }

    let rows = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap();

    assert!(test.log().is_empty());
    assert!(rows.iter().all(|row| row[slot::TAGS] == strings(&[])));
}

async fn provider_limit_is_misuse(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let provider = provider::from_fn("LimitedTagsProvider", |builder, basis| {
        let tag = builder.correlate("Tag")?;
        builder.on(Expr::eq(tag.field("document_id"), basis)).limit(1);
        Ok(())
    });
    let attr = CorrelatedAttribute::new("DocumentView.tags", slot::TAGS, provider)
        .basis(Expr::path("d", "id"))
        .container(ContainerKind::List)
        .subselect();

    let err = engine.resolve(&view, &attr, rows).await.unwrap_err();

    assert!(err.is_provider_misuse());
    assert_eq!(
        err.to_string(),
        "correlation provider 'LimitedTagsProvider' misused the correlation builder: \
         wrongly uses limit/offset in the correlation for 'DocumentView.tags' which \
         might lead to wrong results with sub-select fetching"
    );
    assert!(test.log().is_empty());
}

async fn missing_primary_query_is_invalid_configuration(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", slot::ID));
    let rows = test.primary_rows(&fixtures::document_view()).await;

    let err = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap_err();

    assert!(err.is_invalid_configuration());
}

async fn view_root_without_id_is_unsupported(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d")).primary(fixtures::documents());
    let rows = test.primary_rows(&view).await;

    let err = engine
        .resolve(&view, &fixtures::tags().subselect(), rows)
        .await
        .unwrap_err();

    assert!(err.is_unsupported_feature());
    assert!(test.log().is_empty());
}

tests!(
    collection_is_resolved_with_one_query,
    shared_key_counts_rows_joined_through_its_first_row,
    view_root_correlation_groups_by_root_id,
    limited_primary_query,
    embedding_view_correlation_groups_by_its_id,
    embedding_view_wins_over_view_root,
    parent_slot_outside_the_rows_is_invalid_configuration,
    null_keys_issue_no_query,
    provider_limit_is_misuse,
    missing_primary_query_is_invalid_configuration,
    view_root_without_id_is_unsupported,
);
