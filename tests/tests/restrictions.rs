//! Restriction scenarios: per-container refinements, their union over the
//! ancestor chain and inherited lookup.

use ontic_tests::prelude::*;

fn restricted(tx: &mut MetaTx<'_>) -> SchemaResult<()> {
    let schema = tx.schema();
    let thing = class(schema, "Thing")?;
    let organism = class(schema, "Organism")?;
    let person = class(schema, "Person")?;
    let name = property(schema, "name")?;
    let size = property(schema, "size")?;

    let on_thing = tx.class_restriction(thing, name)?;
    tx.set_min_cardinality(on_thing, Some(1))?;
    let on_organism = tx.class_restriction(organism, size)?;
    tx.set_max_cardinality(on_organism, Some(1))?;
    let on_person = tx.class_restriction(person, name)?;
    tx.set_collection_behaviour(on_person, Some(CollectionBehaviour::List))?;
    Ok(())
}

mod union {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("union")
            .ontology(organisms)
            .ontology(restricted)
            .step(
                "cyborg_below_person_and_organism",
                |tx| {
                    let global = tx.model().global_namespace();
                    let cyborg = tx.class(global, "Cyborg")?;
                    let schema = tx.schema();
                    let person = class(schema, "Person")?;
                    let organism = class(schema, "Organism")?;
                    tx.add_super(cyborg, person)?;
                    tx.add_super(cyborg, organism)
                },
                |a| a.created(1),
            )
            .query(
                "person_sees_three",
                |s| s.all_restrictions(class(s, "Person")?),
                |a| a.rows(3),
            )
            .query(
                "cyborg_sees_each_once",
                |s| s.all_restrictions(class(s, "Cyborg")?),
                |a| a.rows(3),
            )
            .query(
                "nearest_first",
                |s| {
                    let all = s.all_restrictions(class(s, "Person")?)?;
                    let direct = s.direct_restrictions(class(s, "Person")?)?;
                    Ok(all.first() == direct.first() && direct.len() == 1)
                },
                |a| a.value(true),
            )
            .query(
                "restrictions_of_name",
                |s| s.restrictions_of(property(s, "name")?),
                |a| a.rows(2),
            )
            .query(
                "restriction_knows_its_ends",
                |s| {
                    let person = class(s, "Person")?;
                    let name = property(s, "name")?;
                    let Some(restriction) = s.restriction(person, name)? else {
                        return Ok(false);
                    };
                    Ok(s.restriction_container(restriction)? == ContainerId::Class(person)
                        && s.restriction_constrainable(restriction)?
                            == ConstrainableId::Property(name))
                },
                |a| a.value(true),
            )
    }

    #[test]
    fn test_all_restrictions_is_a_union_without_duplicates() {
        scenario().run().unwrap();
    }
}

mod single_restriction {
    use super::*;

    fn chain(tx: &mut MetaTx<'_>) -> SchemaResult<()> {
        let global = tx.model().global_namespace();
        let a = tx.class(global, "A")?;
        let b = tx.class(global, "B")?;
        let c = tx.class(global, "C")?;
        tx.add_super(a, b)?;
        tx.add_super(b, c)?;
        let p = tx.add_required_property(c, "p")?;
        tx.class_restriction(b, p)?;
        Ok(())
    }

    pub fn scenario() -> Scenario {
        Scenario::new("single_restriction")
            .ontology(chain)
            .query(
                "a_sees_only_bs",
                |s| {
                    let all = s.all_restrictions(class(s, "A")?)?;
                    Ok(all == s.direct_restrictions(class(s, "B")?)?)
                },
                |a| a.value(true),
            )
            .query(
                "a_owns_none",
                |s| s.direct_restrictions(class(s, "A")?),
                |a| a.empty(),
            )
            .query(
                "c_sees_none",
                |s| s.all_restrictions(class(s, "C")?),
                |a| a.empty(),
            )
    }

    #[test]
    fn test_restriction_on_middle_class_is_collected_once() {
        scenario().run().unwrap();
    }
}

mod lookup {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("lookup")
            .ontology(organisms)
            .ontology(restricted)
            .query(
                "person_size_from_organism",
                |s| s.lookup(property(s, "size")?, &MaxCardinality, &[class(s, "Person")?]),
                |a| a.value(1u32),
            )
            .query(
                "person_name_min_from_thing",
                |s| s.lookup(property(s, "name")?, &MinCardinality, &[class(s, "Person")?]),
                |a| a.value(1u32),
            )
            .query(
                "person_name_behaviour_is_own",
                |s| {
                    s.lookup(
                        property(s, "name")?,
                        &CollectionBehaviourFinder,
                        &[class(s, "Person")?],
                    )
                },
                |a| a.value("list"),
            )
            .query(
                "thing_has_no_behaviour",
                |s| {
                    s.lookup(
                        property(s, "name")?,
                        &CollectionBehaviourFinder,
                        &[class(s, "Thing")?],
                    )
                },
                |a| a.none(),
            )
            .step(
                "person_tightens_size",
                |tx| {
                    let schema = tx.schema();
                    let person = class(schema, "Person")?;
                    let size = property(schema, "size")?;
                    let restriction = tx.class_restriction(person, size)?;
                    tx.set_cardinality(restriction, Some(0), Some(0))
                },
                |a| a.created(1),
            )
            .query(
                "nearest_restriction_wins",
                |s| s.lookup(property(s, "size")?, &MaxCardinality, &[class(s, "Person")?]),
                |a| a.value(0u32),
            )
            .query(
                "organism_unaffected",
                |s| s.lookup(property(s, "size")?, &MaxCardinality, &[class(s, "Organism")?]),
                |a| a.value(1u32),
            )
            .query(
                "closure_finder",
                |s| {
                    let tightest = finder(|schema: Schema<'_>, r: RestrictableId| {
                        Ok(schema.max_cardinality(r)?.map(|max| max + 10))
                    });
                    s.lookup(property(s, "size")?, &tightest, &[class(s, "Organism")?])
                },
                |a| a.value(11u32),
            )
    }

    #[test]
    fn test_lookup_resolves_through_inheritance() {
        scenario().run().unwrap();
    }
}

mod domains {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("domains")
            .ontology(organisms)
            .ontology(contacts)
            .step(
                "organism_phone",
                |tx| {
                    let schema = tx.schema();
                    let organism = class(schema, "Organism")?;
                    let phone = property(schema, "phone")?;
                    tx.restriction(organism, phone, true)
                },
                |a| a.error_matches("not in the domain"),
            )
            .step(
                "person_name_is_inherited_domain",
                |tx| {
                    let schema = tx.schema();
                    let person = class(schema, "Person")?;
                    let name = property(schema, "name")?;
                    tx.restriction(person, name, true)
                },
                |a| a.created(1),
            )
            .step(
                "lookup_without_create",
                |tx| {
                    let schema = tx.schema();
                    let person = class(schema, "Person")?;
                    let phone = property(schema, "phone")?;
                    tx.restriction(person, phone, false)
                },
                |a| a.none().unchanged(),
            )
            .step(
                "min_above_max",
                |tx| {
                    let phone = property(tx.schema(), "phone")?;
                    tx.set_cardinality(phone, Some(3), Some(1))
                },
                |a| a.error_matches("^Invalid argument"),
            )
    }

    #[test]
    fn test_restrictions_require_domain_membership() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_relaxed_domain_allows_any_pair() {
        Scenario::new("relaxed_domains")
            .config(ModelConfig::new().with_strict_domain(false))
            .ontology(organisms)
            .ontology(contacts)
            .step(
                "organism_phone",
                |tx| {
                    let schema = tx.schema();
                    let organism = class(schema, "Organism")?;
                    let phone = property(schema, "phone")?;
                    tx.restriction(organism, phone, true)
                },
                |a| a.created(1),
            )
            .run()
            .unwrap();
    }
}
