//! Hierarchy scenarios: the super/sub edges stay a DAG and closures come
//! back nearest first.

use ontic_tests::prelude::*;

mod cycles {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("cycles")
            .ontology(organisms)
            .step(
                "close_loop_through_organism",
                |tx| {
                    let schema = tx.schema();
                    let thing = class(schema, "Thing")?;
                    let person = class(schema, "Person")?;
                    tx.add_super(thing, person)
                },
                |a| a.conflict().error_matches("would create a cycle"),
            )
            .step(
                "self_loop",
                |tx| {
                    let organism = class(tx.schema(), "Organism")?;
                    tx.add_super(organism, organism)
                },
                |a| a.conflict(),
            )
            .query(
                "thing_is_still_a_root",
                |s| s.direct_supers(class(s, "Thing")?),
                |a| a.empty(),
            )
            .query(
                "person_supers_unchanged",
                |s| names(s, s.all_supers(class(s, "Person")?)?),
                |a| a.names(&["Organism", "Thing"]),
            )
    }

    #[test]
    fn test_cycle_attempts_leave_hierarchy_unchanged() {
        scenario().run().unwrap();
    }
}

mod diamond {
    use super::*;

    fn shapes(tx: &mut MetaTx<'_>) -> SchemaResult<()> {
        let global = tx.model().global_namespace();
        let top = tx.class(global, "Top")?;
        let left = tx.class(global, "Left")?;
        let right = tx.class(global, "Right")?;
        let bottom = tx.class(global, "Bottom")?;
        tx.add_super(left, top)?;
        tx.add_super(right, top)?;
        tx.add_super(bottom, left)?;
        tx.add_super(bottom, right)?;
        Ok(())
    }

    pub fn scenario() -> Scenario {
        Scenario::new("diamond")
            .ontology(shapes)
            .query(
                "subs_of_top_once_each",
                |s| names(s, s.all_subs(class(s, "Top")?)?),
                |a| a.names(&["Left", "Right", "Bottom"]),
            )
            .query(
                "supers_of_bottom",
                |s| names(s, s.all_supers(class(s, "Bottom")?)?),
                |a| a.names(&["Left", "Right", "Top"]),
            )
            .query(
                "bottom_is_a_top",
                |s| s.is_subtype_of(class(s, "Bottom")?, class(s, "Top")?),
                |a| a.value(true),
            )
            .query(
                "subtype_is_not_reflexive",
                |s| s.is_subtype_of(class(s, "Top")?, class(s, "Top")?),
                |a| a.value(false),
            )
            .step(
                "implied_edge_is_accepted",
                |tx| {
                    let schema = tx.schema();
                    let bottom = class(schema, "Bottom")?;
                    let top = class(schema, "Top")?;
                    tx.add_super(bottom, top)
                },
                |a| a.unchanged(),
            )
            .step(
                "top_below_bottom_is_a_cycle",
                |tx| {
                    let schema = tx.schema();
                    let bottom = class(schema, "Bottom")?;
                    let top = class(schema, "Top")?;
                    tx.add_super(top, bottom)
                },
                |a| a.conflict(),
            )
            .step(
                "detach_right",
                |tx| {
                    let schema = tx.schema();
                    let bottom = class(schema, "Bottom")?;
                    let right = class(schema, "Right")?;
                    tx.remove_super(bottom, right)
                },
                |a| a.value(true).unchanged(),
            )
            .query(
                "right_has_no_subs",
                |s| s.all_subs(class(s, "Right")?),
                |a| a.empty(),
            )
    }

    #[test]
    fn test_diamond_closures_have_no_duplicates() {
        scenario().run().unwrap();
    }
}

mod property_hierarchy {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("property_hierarchy")
            .step(
                "name_family",
                |tx| {
                    let global = tx.model().global_namespace();
                    let name = tx.property(global, "name")?;
                    let given = tx.property(global, "givenName")?;
                    let family = tx.property(global, "familyName")?;
                    tx.add_sub(name, given)?;
                    tx.add_sub(name, family)
                },
                |a| a.created(3),
            )
            .query(
                "subs_of_name",
                |s| names(s, s.direct_subs(property(s, "name")?)?),
                |a| a.names(&["givenName", "familyName"]),
            )
            .step(
                "name_below_given_name",
                |tx| {
                    let schema = tx.schema();
                    let name = property(schema, "name")?;
                    let given = property(schema, "givenName")?;
                    tx.add_super(name, given)
                },
                |a| a.conflict(),
            )
    }

    #[test]
    fn test_property_hierarchy_is_a_dag() {
        scenario().run().unwrap();
    }
}
