//! Deletion scenarios: owned children cascade, shared ones survive while
//! still declared elsewhere, hierarchy neighbours are only unlinked.

use ontic_tests::prelude::*;

fn restrict_size(tx: &mut MetaTx<'_>) -> SchemaResult<()> {
    let schema = tx.schema();
    let organism = class(schema, "Organism")?;
    let size = property(schema, "size")?;
    let restriction = tx.class_restriction(organism, size)?;
    tx.set_max_cardinality(restriction, Some(1))
}

mod class_cascade {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("class_cascade")
            .ontology(organisms)
            .ontology(restrict_size)
            .step(
                "delete_organism",
                |tx| {
                    let organism = class(tx.schema(), "Organism")?;
                    tx.delete_class(organism)
                },
                |a| a.value(3i64).deleted(3).created(0),
            )
            .query(
                "organism_gone",
                |s| s.find_class(s.global_namespace(), "Organism"),
                |a| a.none(),
            )
            .query(
                "size_gone_with_it",
                |s| s.find_property(s.global_namespace(), "size"),
                |a| a.none(),
            )
            .query(
                "person_detached",
                |s| s.all_supers(class(s, "Person")?),
                |a| a.empty(),
            )
            .query(
                "thing_keeps_name",
                |s| names(s, s.direct_properties(class(s, "Thing")?)?),
                |a| a.names(&["name"]),
            )
            .query(
                "remaining_classes",
                |s| names(s, s.classes(s.global_namespace())?),
                |a| a.names(&["Thing", "Person", "Other"]),
            )
    }

    #[test]
    fn test_class_delete_cascades() {
        scenario().run().unwrap();
    }
}

mod shared_children {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("shared_children")
            .ontology(social)
            .step(
                "company_has_a_name_too",
                |tx| {
                    let global = tx.model().global_namespace();
                    let person = class(tx.schema(), "Person")?;
                    let company = class(tx.schema(), "Company")?;
                    let name = tx.property(global, "name")?;
                    tx.declare_property(person, name)?;
                    tx.declare_property(company, name)
                },
                |a| a.created(1),
            )
            .step(
                "delete_company",
                |tx| {
                    let company = class(tx.schema(), "Company")?;
                    tx.delete_class(company)
                },
                |a| a.deleted(1),
            )
            .query(
                "works_for_still_declared_by_person",
                |s| names(s, s.associated_classes(relationship_type(s, "worksFor")?, Direction::Both)?),
                |a| a.names(&["Person"]),
            )
            .query(
                "name_still_on_person",
                |s| names(s, s.direct_properties(class(s, "Person")?)?),
                |a| a.names(&["name"]),
            )
            .step(
                "delete_person",
                |tx| {
                    let person = class(tx.schema(), "Person")?;
                    tx.delete_class(person)
                },
                |a| a.deleted(4),
            )
            .query(
                "only_student_left",
                |s| names(s, s.classes(s.global_namespace())?),
                |a| a.names(&["Student"]),
            )
    }

    #[test]
    fn test_shared_children_survive_until_last_owner() {
        scenario().run().unwrap();
    }
}

mod constrainable_delete {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("constrainable_delete")
            .ontology(organisms)
            .ontology(restrict_size)
            .step(
                "delete_size",
                |tx| {
                    let size = property(tx.schema(), "size")?;
                    tx.delete_property(size)
                },
                |a| a.deleted(2),
            )
            .query(
                "organism_unrestricted",
                |s| s.direct_restrictions(class(s, "Organism")?),
                |a| a.empty(),
            )
            .step(
                "delete_restriction_alone",
                |tx| {
                    let schema = tx.schema();
                    let thing = class(schema, "Thing")?;
                    let name = property(schema, "name")?;
                    let restriction = tx.class_restriction(thing, name)?;
                    tx.delete_restriction(restriction)
                },
                |a| a.value(1i64).unchanged(),
            )
            .query(
                "thing_still_requires_name",
                |s| names(s, s.direct_properties(class(s, "Thing")?)?),
                |a| a.names(&["name"]),
            )
    }

    #[test]
    fn test_constrainable_delete_takes_its_restrictions() {
        scenario().run().unwrap();
    }
}

mod namespaces {
    use super::*;

    fn foaf(tx: &mut MetaTx<'_>) -> SchemaResult<()> {
        let foaf = tx.create_namespace("foaf")?;
        let agent = tx.class(foaf, "Agent")?;
        let person = tx.class(foaf, "Person")?;
        tx.add_super(person, agent)?;
        tx.add_required_property(agent, "mbox")?;
        tx.relationship_type(foaf, "knows")?;
        Ok(())
    }

    pub fn scenario() -> Scenario {
        Scenario::new("namespace_delete")
            .ontology(foaf)
            .step(
                "global_is_permanent",
                |tx| {
                    let global = tx.model().global_namespace();
                    tx.delete_namespace(global)
                },
                |a| a.error_matches("cannot be deleted"),
            )
            .step(
                "delete_foaf",
                |tx| match tx.namespace("foaf", false)? {
                    Some(foaf) => tx.delete_namespace(foaf),
                    None => Err(SchemaError::not_found("foaf")),
                },
                |a| a.deleted(5),
            )
            .query("only_global_left", |s| Ok(s.namespaces()), |a| a.rows(1))
            .query(
                "name_cache_forgot_foaf",
                |s| Ok(s.namespace("foaf").is_none()),
                |a| a.value(true),
            )
    }

    #[test]
    fn test_namespace_delete_takes_its_contents() {
        scenario().run().unwrap();
    }
}
