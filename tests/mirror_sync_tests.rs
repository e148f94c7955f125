use caja_core::{
    catalog::{Catalog, CatalogKind, CategoryService},
    category::{CategoryNode, Code, NodePatch},
    errors::CoreError,
    storage::{CatalogStore, CategoryStore},
    sync::synchronize_mirror,
};

fn code(raw: &str) -> Code {
    raw.parse().unwrap()
}

/// Two professionals under one root; Dr. Perez already takes cash.
fn practice() -> CatalogStore {
    let mut catalog = Catalog::new("consultorio", CatalogKind::Income);
    for (c, name) in [
        ("1", "Honorarios"),
        ("1.1", "Dr. Perez"),
        ("1.2", "Dr. Gomez"),
        ("1.1.1", "Efectivo"),
    ] {
        catalog.add_category(CategoryNode::new(code(c), name));
    }
    CatalogStore::new(catalog)
}

#[test]
fn new_child_propagates_to_the_parallel_branch() {
    let store = practice();
    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();

    assert_eq!(report.created.len(), 1);
    let replica = &report.created[0];
    assert_eq!(replica.code.to_string(), "1.2.1");
    assert_eq!(replica.name, "Efectivo");
    assert_eq!(replica.parent_code.as_ref().unwrap().to_string(), "1.2");
    assert_eq!(replica.level, 3);
}

#[test]
fn a_second_run_creates_nothing() {
    let store = practice();
    synchronize_mirror(&store, &code("1.1.1")).unwrap();
    let before = store.list_all().unwrap().len();

    let second = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, vec![code("1.2.1")]);
    assert_eq!(store.list_all().unwrap().len(), before);
}

#[test]
fn name_variants_never_duplicate() {
    let store = practice();
    // Dr. Gomez already has a cash child, spelled differently.
    store
        .create(CategoryNode::new(code("1.2.3"), "efectivo "))
        .unwrap();

    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    assert!(report.created.is_empty());
    assert_eq!(report.skipped, vec![code("1.2.3")]);
}

#[test]
fn taken_codes_fall_back_to_the_allocator() {
    let store = practice();
    // The naive transposition 1.2.1 is occupied by something else.
    store
        .create(CategoryNode::new(code("1.2.1"), "Obra Social"))
        .unwrap();

    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].code.to_string(), "1.2.2");
    assert_eq!(report.created[0].name, "Efectivo");
}

#[test]
fn nested_structure_replicates_in_one_pass() {
    let store = practice();
    let mut list = CategoryNode::new(code("1.1.1.1"), "Billetes");
    list.is_list = true;
    store.create(list).unwrap();
    store
        .create(CategoryNode::new(code("1.1.1.1.1"), "Grandes"))
        .unwrap();

    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    let created: Vec<String> = report
        .created
        .iter()
        .map(|n| n.code.to_string())
        .collect();
    assert_eq!(created, ["1.2.1", "1.2.1.1", "1.2.1.1.1"]);
    assert!(report.created[1].is_list);
}

#[test]
fn mirroring_stays_inside_the_root_branch() {
    let store = practice();
    store
        .create(CategoryNode::new(code("2"), "Alquileres"))
        .unwrap();
    store
        .create(CategoryNode::new(code("2.1"), "Local Centro"))
        .unwrap();

    synchronize_mirror(&store, &code("1.1.1")).unwrap();
    // The unrelated root gained nothing.
    assert!(store.find_children(&code("2.1")).unwrap().is_empty());
}

#[test]
fn top_level_nodes_have_no_mirrors() {
    let store = practice();
    let report = synchronize_mirror(&store, &code("1")).unwrap();
    assert!(report.created.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn add_category_mirrors_as_part_of_the_create_flow() {
    let store = practice();
    let (node, report) = CategoryService::add_category(
        &store,
        "Tarjeta",
        Some(&code("1.1")),
        false,
    )
    .unwrap();
    assert_eq!(node.code.to_string(), "1.1.2");
    assert_eq!(report.created.len(), 1);
    assert_eq!(report.created[0].parent_code.as_ref().unwrap(), &code("1.2"));
}

#[test]
fn attach_items_numbers_past_existing_and_mirrors() {
    let store = practice();
    // Make the cash node a list on both branches first.
    let list: Code = code("1.1.1");
    store
        .update(&list, caja_core::category::NodePatch {
            is_list: Some(true),
            ..Default::default()
        })
        .unwrap();
    synchronize_mirror(&store, &list).unwrap();

    let (created, report) = CategoryService::attach_items(
        &store,
        &list,
        &["Billetes".to_string(), "Monedas".to_string()],
    )
    .unwrap();
    let codes: Vec<String> = created.iter().map(|n| n.code.to_string()).collect();
    assert_eq!(codes, ["1.1.1.1", "1.1.1.2"]);

    // The parallel list received both items too.
    let mirrored: Vec<String> = report
        .created
        .iter()
        .map(|n| n.code.to_string())
        .collect();
    assert_eq!(mirrored, ["1.2.1.1", "1.2.1.2"]);
}

#[test]
fn reattaching_an_existing_item_is_rejected() {
    let store = practice();
    let list: Code = code("1.1.1");
    store
        .update(&list, NodePatch {
            is_list: Some(true),
            ..Default::default()
        })
        .unwrap();
    synchronize_mirror(&store, &list).unwrap();
    CategoryService::attach_items(&store, &list, &["Billetes".to_string()]).unwrap();

    let err = CategoryService::attach_items(&store, &list, &["billetes ".to_string()])
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateName { .. }));
    // Both the list and its mirror still carry exactly one item.
    assert_eq!(store.find_children(&list).unwrap().len(), 1);
    assert_eq!(store.find_children(&code("1.2.1")).unwrap().len(), 1);
}

#[test]
fn duplicate_items_within_one_batch_are_rejected() {
    let store = practice();
    let list: Code = code("1.1.1");
    store
        .update(&list, NodePatch {
            is_list: Some(true),
            ..Default::default()
        })
        .unwrap();

    let err = CategoryService::attach_items(
        &store,
        &list,
        &["Monedas".to_string(), " monedas".to_string()],
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateName { .. }));
    // The batch is validated up front, so nothing landed.
    assert!(store.find_children(&list).unwrap().is_empty());
}

#[test]
fn a_deactivated_equivalent_blocks_its_subtree() {
    let store = practice();
    synchronize_mirror(&store, &code("1.1.1")).unwrap();
    store
        .update(&code("1.2.1"), NodePatch::deactivate())
        .unwrap();
    store
        .create(CategoryNode::new(code("1.1.1.1"), "Billetes"))
        .unwrap();

    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    assert!(report.created.is_empty());
    assert_eq!(report.skipped, vec![code("1.2.1")]);
    // Nothing grew under the soft-deleted node.
    assert!(store.find_children(&code("1.2.1")).unwrap().is_empty());
}

#[test]
fn deactivated_branches_are_not_targets() {
    let store = practice();
    store
        .update(&code("1.2"), caja_core::category::NodePatch::deactivate())
        .unwrap();

    let report = synchronize_mirror(&store, &code("1.1.1")).unwrap();
    assert!(report.created.is_empty());
}
