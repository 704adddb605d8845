//! Instance membership, including concurrent counting.

use std::thread;

use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;

mod membership {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("membership")
            .ontology(social)
            .model_step(
                "alice_is_a_student",
                |model| {
                    let alice = model.write(|tx| Ok(tx.create_entity()))?;
                    let student = class(model.read().schema(), "Student")?;
                    model.add_instance(student, alice)
                },
                |a| a.value(true).created(1),
            )
            .query(
                "student_count",
                |s| s.instance_count(class(s, "Student")?),
                |a| a.value(1i64),
            )
            .query(
                "person_has_no_direct_instances",
                |s| s.direct_instances(class(s, "Person")?),
                |a| a.empty(),
            )
            .query(
                "person_sees_alice_through_student",
                |s| s.all_instances(class(s, "Person")?),
                |a| a.rows(1),
            )
            .model_step(
                "companies_are_not_instances",
                |model| {
                    let view = model.read();
                    let schema = view.schema();
                    let person = class(schema, "Person")?;
                    let company = class(schema, "Company")?;
                    drop(view);
                    model.add_instance(person, company.node())
                },
                |a| a.error_matches("^Illegal state"),
            )
    }

    #[test]
    fn test_instances_count_per_class() {
        scenario().run().unwrap();
    }
}

// ========== TEST: concurrent adds and removes keep the count exact ==========
#[test]
fn test_concurrent_instance_counting() {
    const ADDS: usize = 24;
    const REMOVES: usize = 9;

    // GIVEN a class and ADDS fresh entities
    let model = MetaModel::new();
    let global = model.global_namespace();
    let (person, entities) = model
        .write(|tx| {
            let person = tx.class(global, "Person")?;
            let entities: Vec<NodeId> = (0..ADDS).map(|_| tx.create_entity()).collect();
            Ok((person, entities))
        })
        .unwrap();

    // WHEN every entity is added from its own thread
    thread::scope(|scope| {
        for entity in &entities {
            let model = &model;
            scope.spawn(move || model.add_instance(person, *entity).unwrap());
        }
    });

    // AND REMOVES of them are removed concurrently
    thread::scope(|scope| {
        for entity in entities.iter().take(REMOVES) {
            let model = &model;
            scope.spawn(move || model.remove_instance(person, *entity).unwrap());
        }
    });

    // THEN the count matches the surviving instance edges
    let view = model.read();
    let schema = view.schema();
    assert_eq!(schema.instance_count(person).unwrap(), (ADDS - REMOVES) as u64);
    let mut remaining = schema.direct_instances(person).unwrap();
    remaining.sort();
    let mut expected = entities[REMOVES..].to_vec();
    expected.sort();
    assert_eq!(remaining, expected);
}
