use correlate::{
    provider,
    stmt::Expr,
    Config, CorrelatedAttribute, ContainerKind, Value, ValueRecord, ViewContext, ViewType,
};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, slot, strings},
    tests, EngineTest,
};

async fn parents_outnumbering_correlations_batch_parent_ids(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let rows = engine
        .resolve(&view, &fixtures::team_documents().batch_size(2), rows)
        .await
        .unwrap();

    // Team 10 has three documents and needs two batches; team 20 one.
    assert_eq!(
        test.log().params("parent_ids"),
        [
            Some(Value::List(vec![Value::I64(1), Value::I64(2)])),
            Some(Value::List(vec![Value::I64(3), Value::Null])),
            Some(Value::List(vec![Value::I64(4), Value::Null])),
        ]
    );
    assert_eq!(
        test.log().params("correlation_key"),
        [
            Some(Value::I64(10)),
            Some(Value::I64(10)),
            Some(Value::I64(20)),
        ]
    );

    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], strings(&["Codegen", "Linking"]));
    assert_eq!(rows[1][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Linking"]));
    assert_eq!(rows[2][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Codegen"]));
    assert_eq!(rows[3][slot::TEAM_DOCUMENTS], strings(&[]));
}

async fn tie_batches_correlation_values_per_parent(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows: Vec<_> = test
        .primary_rows(&view)
        .await
        .into_iter()
        .filter(|row| row[slot::ID] == Value::I64(1) || row[slot::ID] == Value::I64(4))
        .collect();

    let rows = engine
        .resolve(&view, &fixtures::team_documents().batch_size(2), rows)
        .await
        .unwrap();

    assert_eq!(
        test.log().params("parent_id"),
        [Some(Value::I64(1)), Some(Value::I64(4))]
    );
    assert_eq!(
        test.log().params("correlation_keys"),
        [
            Some(Value::List(vec![Value::I64(10), Value::Null])),
            Some(Value::List(vec![Value::I64(20), Value::Null])),
        ]
    );

    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], strings(&["Codegen", "Linking"]));
    assert_eq!(rows[1][slot::TEAM_DOCUMENTS], strings(&[]));
}

async fn query_is_rebuilt_when_the_expected_orientation_is_wrong(test: &mut EngineTest) {
    let config = Config::new()
        .expect_batch_correlation_values_for("DocumentView.teamDocuments", false);
    let engine = test.try_engine(config).unwrap();
    let view = fixtures::document_view();
    let rows: Vec<_> = test
        .primary_rows(&view)
        .await
        .into_iter()
        .filter(|row| row[slot::ID] == Value::I64(2) || row[slot::ID] == Value::I64(4))
        .collect();

    let rows = engine
        .resolve(&view, &fixtures::team_documents().batch_size(2), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 2);
    assert_eq!(test.log().count(|query| query.params.contains("parent_ids")), 0);
    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Linking"]));
}

async fn unbatched_parent_correlation_binds_both_keys(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = test.primary_rows(&view).await;

    let rows = engine
        .resolve(&view, &fixtures::team_documents(), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 4);
    assert_eq!(
        test.log().count(|query| {
            query.params.contains("correlation_key") && query.params.contains("parent_id")
        }),
        4
    );
    assert_eq!(rows[2][slot::TEAM_DOCUMENTS], strings(&["Parsing", "Codegen"]));
}

async fn rows_sharing_a_parent_and_key_share_a_promise(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let mut rows = test.primary_rows(&view).await;
    rows.truncate(1);
    rows.push(rows[0].clone());

    let rows = engine
        .resolve(&view, &fixtures::team_documents().batch_size(2), rows)
        .await
        .unwrap();

    assert_eq!(test.log().len(), 1);
    assert_eq!(rows[0][slot::TEAM_DOCUMENTS], rows[1][slot::TEAM_DOCUMENTS]);
}

async fn view_root_without_id_is_illegal(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d"));
    let rows = test.primary_rows(&fixtures::document_view()).await;

    let err = engine
        .resolve(&view, &fixtures::team_documents(), rows)
        .await
        .unwrap_err();

    assert!(err.is_illegal_grouping_state());
    assert_eq!(
        err.to_string(),
        "illegal grouping state: The use of VIEW_ROOT in the correlation for \
         'DocumentView.teamDocuments' is illegal because the view root type \
         'DocumentView' does not declare an id"
    );
    assert!(test.log().is_empty());
}

async fn parent_slot_outside_the_rows_is_invalid_configuration(test: &mut EngineTest) {
    let engine = test.engine();
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", 42));
    let rows = test.primary_rows(&fixtures::document_view()).await;

    let err = engine
        .resolve(&view, &fixtures::team_documents().batch_size(2), rows)
        .await
        .unwrap_err();

    assert!(err.is_invalid_configuration());
    assert_eq!(
        err.to_string(),
        "invalid configuration: parent id slot 42 of 'DocumentView.teamDocuments' \
         is out of bounds for a row of 7 fields"
    );
    assert!(test.log().is_empty());
}

fn section_members() -> CorrelatedAttribute {
    let provider = provider::from_fn("SectionMembersProvider", |builder, basis| {
        let person = builder.correlate("Person")?;
        let section = builder.embedding_view();
        builder
            .on(Expr::eq(person.field("team_id"), basis))
            .on(Expr::ne(person.field("id"), section));
        Ok(())
    });

    CorrelatedAttribute::new("SectionView.members", 1, provider)
        .result("name")
        .container(ContainerKind::List)
        .batch_size(4)
}

async fn embedding_view_groups_by_its_id(test: &mut EngineTest) {
    let engine = test.engine();

    // Rows of [section owner id, team id]
    let view = ViewContext::new(ViewType::new("DocumentView", "d").id("id", 2))
        .embedding_view(ViewType::new("SectionView", "s").id("owner_id", 0));
    let rows = vec![
        ValueRecord::from_vec(vec![Value::I64(1), Value::I64(10), Value::I64(1)]),
        ValueRecord::from_vec(vec![Value::I64(4), Value::I64(20), Value::I64(1)]),
    ];

    let rows = engine.resolve(&view, &section_members(), rows).await.unwrap();

    assert_eq!(rows[0][1], strings(&["Grace"]));
    assert_eq!(rows[1][1], strings(&[]));
}

async fn missing_embedding_view_is_illegal(test: &mut EngineTest) {
    let engine = test.engine();
    let view = fixtures::document_view();
    let rows = vec![ValueRecord::from_vec(vec![Value::I64(1), Value::I64(10)])];

    let err = engine
        .resolve(&view, &section_members(), rows)
        .await
        .unwrap_err();

    assert!(err.is_illegal_grouping_state());
    assert!(test.log().is_empty());
}

async fn referencing_both_parents_is_unsupported(test: &mut EngineTest) {
    let engine = test.engine();

    let provider = provider::from_fn("BothParentsProvider", |builder, basis| {
        let document = builder.correlate("Document")?;
        let root = builder.view_root();
        let embedding = builder.embedding_view();
        builder
            .on(Expr::eq(document.field("team_id"), basis))
            .on(Expr::ne(document.field("id"), root))
            .on(Expr::ne(document.field("owner_id"), embedding));
        Ok(())
    });
    let attr = CorrelatedAttribute::new("SectionView.documents", 1, provider).batch_size(2);

    let view = fixtures::document_view().embedding_view(ViewType::new("SectionView", "s").id("id", 0));
    let rows = vec![ValueRecord::from_vec(vec![Value::I64(1), Value::I64(10)])];

    let err = engine.resolve(&view, &attr, rows).await.unwrap_err();
    assert!(err.is_unsupported_feature());
}

tests!(
    parents_outnumbering_correlations_batch_parent_ids,
    tie_batches_correlation_values_per_parent,
    query_is_rebuilt_when_the_expected_orientation_is_wrong,
    unbatched_parent_correlation_binds_both_keys,
    rows_sharing_a_parent_and_key_share_a_promise,
    view_root_without_id_is_illegal,
    parent_slot_outside_the_rows_is_invalid_configuration,
    embedding_view_groups_by_its_id,
    missing_embedding_view_is_illegal,
    referencing_both_parents_is_unsupported,
);
