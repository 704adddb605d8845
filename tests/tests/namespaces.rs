//! Naming scenarios: per-namespace uniqueness, find-or-create and
//! annotations on things.

use ontic_tests::prelude::*;

mod scoping {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("scoping")
            .step("create_foaf", |tx| tx.create_namespace("foaf"), |a| a.created(1))
            .step(
                "foaf_again",
                |tx| tx.create_namespace("foaf"),
                |a| a.error_matches("^Duplicate namespace name: foaf"),
            )
            .step(
                "person_in_both",
                |tx| {
                    let global = tx.model().global_namespace();
                    let foaf = tx.namespace("foaf", false)?.ok_or_else(|| SchemaError::not_found("foaf"))?;
                    tx.class(global, "Person")?;
                    tx.class(foaf, "Person")
                },
                |a| a.created(2),
            )
            .step(
                "find_or_create_is_stable",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.class(global, "Person")
                },
                |a| a.unchanged(),
            )
            .step(
                "duplicate_class",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.create_class(global, "Person")
                },
                |a| a.error("Duplicate"),
            )
            .step(
                "kinds_do_not_collide",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.create_property(global, "Person")
                },
                |a| a.created(1),
            )
            .step(
                "blank_names_rejected",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.class(global, "  ")
                },
                |a| a.error_matches("^Invalid argument"),
            )
            .query(
                "namespaces_global_first",
                |s| Ok(s.namespaces()),
                |a| a.rows(2),
            )
            .query(
                "foaf_person_is_distinct",
                |s| {
                    let Some(foaf) = s.namespace("foaf") else {
                        return Ok(false);
                    };
                    let here = s.find_class(s.global_namespace(), "Person")?;
                    let there = s.find_class(foaf, "Person")?;
                    Ok(here.is_some() && there.is_some() && here != there)
                },
                |a| a.value(true),
            )
            .query(
                "namespace_of_foaf_person",
                |s| {
                    let foaf = s.namespace("foaf");
                    let person = match foaf {
                        Some(foaf) => s.find_class(foaf, "Person")?,
                        None => None,
                    };
                    match person {
                        Some(person) => Ok(Some(s.namespace_of(person)?) == foaf),
                        None => Ok(false),
                    }
                },
                |a| a.value(true),
            )
    }

    #[test]
    fn test_names_are_scoped_per_namespace_and_kind() {
        scenario().run().unwrap();
    }

    // ========== TEST: aborted creations leave no cached names ==========
    #[test]
    fn test_aborted_names_are_not_cached() {
        let model = Scenario::new("aborted_names")
            .step(
                "create_then_fail",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.class(global, "Ghost")?;
                    tx.create_class(global, "Ghost")
                },
                |a| a.error("Duplicate"),
            )
            .query(
                "ghost_absent",
                |s| s.find_class(s.global_namespace(), "Ghost"),
                |a| a.none(),
            )
            .run()
            .unwrap();
        assert_eq!(model.read().schema().store().node_count(), 2);
    }
}

mod annotations {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("annotations")
            .ontology(organisms)
            .step(
                "label_person",
                |tx| {
                    let person = class(tx.schema(), "Person")?;
                    tx.set_label(person, "Person")?;
                    tx.set_comment(person, "A human being")?;
                    tx.set_additional_property(person, "seeAlso", "http://xmlns.com/foaf/0.1/Person")
                },
                |a| a.unchanged(),
            )
            .query(
                "label",
                |s| Ok(s.label(class(s, "Person")?)?.map(Value::from)),
                |a| a.value("Person"),
            )
            .query(
                "see_also",
                |s| Ok(s.additional_property(class(s, "Person")?, "seeAlso")?.cloned()),
                |a| a.value("http://xmlns.com/foaf/0.1/Person"),
            )
            .query(
                "keys_sorted",
                |s| {
                    let found = s.additional_properties(class(s, "Person")?)?;
                    Ok(found.into_iter().map(|(key, _)| key.to_string()).collect::<Vec<_>>())
                },
                |a| a.names(&["comment", "label", "seeAlso"]),
            )
            .step(
                "parent_and_child",
                |tx| {
                    let global = tx.model().global_namespace();
                    let parent = tx.property(global, "parentOf")?;
                    let child = tx.property(global, "childOf")?;
                    tx.set_inverse_of(parent, Some(child))
                },
                |a| a.created(2),
            )
            .query(
                "inverse_is_symmetric",
                |s| s.inverse_of(property(s, "childOf")?),
                |a| a.rows(1),
            )
            .query(
                "inverse_name",
                |s| {
                    let inverse = s.inverse_of(property(s, "childOf")?)?;
                    Ok(inverse.map(|p| names(s, vec![p])).transpose()?.unwrap_or_default())
                },
                |a| a.names(&["parentOf"]),
            )
    }

    #[test]
    fn test_annotations_and_inverses() {
        scenario().run().unwrap();
    }
}
