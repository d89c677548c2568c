//! Description templates and dump formatting helpers

/// (key, sentence, negated sentence); `%N%` is replaced by the N-th argument
const TEMPLATES: &[(&str, &str, &str)] = &[
    ("DESC_ALL", "any object", "no object"),
    ("DESC_NONE", "no object", "any object"),
    ("DESC_SOURCE", "is the source object", "is not the source object"),
    ("DESC_ROOT_CANDIDATE", "is the root candidate", "is not the root candidate"),
    ("DESC_TARGET", "is the target object", "is not the target object"),
    ("DESC_OBJECT_ID", "is object %1%", "is not object %1%"),
    ("DESC_TYPE", "is a %1%", "is not a %1%"),
    ("DESC_BUILDING", "is a building of type %1%", "is not a building of type %1%"),
    ("DESC_BUILDING_ANY", "is a building", "is not a building"),
    ("DESC_HAS_SPECIAL", "has the special %1%", "does not have the special %1%"),
    ("DESC_HAS_SPECIAL_ANY", "has a special", "has no special"),
    (
        "DESC_HAS_SPECIAL_TURNS",
        "has the special %1% added between turns %2% and %3%",
        "does not have the special %1% added between turns %2% and %3%",
    ),
    ("DESC_HAS_TAG", "has the tag %1%", "does not have the tag %1%"),
    (
        "DESC_CREATED_ON_TURN",
        "was created between turns %1% and %2%",
        "was not created between turns %1% and %2%",
    ),
    ("DESC_CAPITAL", "is an empire capital", "is not an empire capital"),
    ("DESC_MONSTER", "is a monster", "is not a monster"),
    ("DESC_ARMED", "is armed", "is not armed"),
    ("DESC_STATIONARY", "is stationary", "is moving"),
    ("DESC_HOMEWORLD", "is the homeworld of %1%", "is not the homeworld of %1%"),
    ("DESC_HOMEWORLD_ANY", "is a species homeworld", "is not a species homeworld"),
    ("DESC_OWNED_BY", "is owned by empire %1%", "is not owned by empire %1%"),
    ("DESC_OWNED_BY_ENEMY", "is owned by an enemy of %1%", "is not owned by an enemy of %1%"),
    ("DESC_OWNED_BY_ALLY", "is owned by an ally of %1%", "is not owned by an ally of %1%"),
    ("DESC_OWNED_BY_ANY", "is owned by an empire", "is unowned"),
    ("DESC_VISIBLE_TO_EMPIRE", "is visible to empire %1%", "is not visible to empire %1%"),
    ("DESC_PRODUCED_BY_EMPIRE", "was produced by empire %1%", "was not produced by empire %1%"),
    ("DESC_EXPLORED_BY_EMPIRE", "was explored by empire %1%", "was not explored by empire %1%"),
    (
        "DESC_OWNER_HAS_TECH",
        "is owned by an empire that knows %1%",
        "is not owned by an empire that knows %1%",
    ),
    (
        "DESC_OWNER_HAS_BUILDING_TYPE",
        "is owned by an empire that can produce the building %1%",
        "is not owned by an empire that can produce the building %1%",
    ),
    (
        "DESC_OWNER_HAS_SHIP_DESIGN",
        "is owned by an empire that can produce design %1%",
        "is not owned by an empire that can produce design %1%",
    ),
    ("DESC_PLANET_TYPE", "is a planet of type %1%", "is not a planet of type %1%"),
    ("DESC_PLANET_SIZE", "is a planet of size %1%", "is not a planet of size %1%"),
    (
        "DESC_PLANET_ENVIRONMENT",
        "is a planet with %1% environment for %2%",
        "is not a planet with %1% environment for %2%",
    ),
    ("DESC_SPECIES", "is inhabited by %1%", "is not inhabited by %1%"),
    ("DESC_SPECIES_ANY", "is inhabited", "is uninhabited"),
    ("DESC_FOCUS_TYPE", "has focus %1%", "does not have focus %1%"),
    ("DESC_STAR_TYPE", "is at a star of type %1%", "is not at a star of type %1%"),
    ("DESC_CAN_COLONIZE", "has a species that can colonize", "has no species that can colonize"),
    (
        "DESC_CAN_PRODUCE_SHIPS",
        "has a species that can produce ships",
        "has no species that can produce ships",
    ),
    ("DESC_DESIGN_HAS_HULL", "has the hull %1%", "does not have the hull %1%"),
    (
        "DESC_DESIGN_HAS_PART",
        "has between %1% and %2% of the part %3%",
        "does not have between %1% and %2% of the part %3%",
    ),
    (
        "DESC_DESIGN_HAS_PART_CLASS",
        "has between %1% and %2% parts of class %3%",
        "does not have between %1% and %2% parts of class %3%",
    ),
    (
        "DESC_PREDEFINED_SHIP_DESIGN",
        "is of the premade design %1%",
        "is not of the premade design %1%",
    ),
    ("DESC_NUMBERED_SHIP_DESIGN", "is of design %1%", "is not of design %1%"),
    (
        "DESC_METER_VALUE",
        "has a %1% meter between %2% and %3%",
        "does not have a %1% meter between %2% and %3%",
    ),
    (
        "DESC_SHIP_PART_METER_VALUE",
        "has a %1% part %2% meter between %3% and %4%",
        "does not have a %1% part %2% meter between %3% and %4%",
    ),
    (
        "DESC_EMPIRE_STOCKPILE",
        "empire %1% has between %3% and %4% %2% stockpiled",
        "empire %1% does not have between %3% and %4% %2% stockpiled",
    ),
    (
        "DESC_EMPIRE_METER_VALUE",
        "empire %1% has a %2% meter between %3% and %4%",
        "empire %1% does not have a %2% meter between %3% and %4%",
    ),
    (
        "DESC_CAN_ADD_STARLANE_CONNECTION",
        "could gain a new starlane to each object that %1%",
        "could not gain a new starlane to each object that %1%",
    ),
    ("DESC_VALUE_TEST", "%1% is between %2% and %3%", "%1% is not between %2% and %3%"),
    (
        "DESC_TURN",
        "the current turn is between %1% and %2%",
        "the current turn is not between %1% and %2%",
    ),
    ("DESC_CHANCE", "with %1% probability", "with %1% probability of not"),
    (
        "DESC_ENQUEUED",
        "has between %1% and %2% of %3% enqueued by %4%",
        "does not have between %1% and %2% of %3% enqueued by %4%",
    ),
    (
        "DESC_NUMBER",
        "between %1% and %2% objects exist that %3%",
        "not between %1% and %2% objects exist that %3%",
    ),
    (
        "DESC_SORTED_RANDOM",
        "is one of %1% random objects that %2%",
        "is not one of %1% random objects that %2%",
    ),
    (
        "DESC_SORTED_MAX",
        "is one of %1% objects with the largest %2% that %3%",
        "is not one of %1% objects with the largest %2% that %3%",
    ),
    (
        "DESC_SORTED_MIN",
        "is one of %1% objects with the smallest %2% that %3%",
        "is not one of %1% objects with the smallest %2% that %3%",
    ),
    (
        "DESC_SORTED_MODE",
        "is one of %1% objects with the most common %2% that %3%",
        "is not one of %1% objects with the most common %2% that %3%",
    ),
    (
        "DESC_WITHIN_DISTANCE",
        "is within %1% of an object that %2%",
        "is not within %1% of an object that %2%",
    ),
    (
        "DESC_WITHIN_STARLANE_JUMPS",
        "is within %1% starlane jumps of an object that %2%",
        "is not within %1% starlane jumps of an object that %2%",
    ),
    ("DESC_IN_SYSTEM", "is in system %1%", "is not in system %1%"),
    ("DESC_IN_SYSTEM_ANY", "is in a system", "is not in a system"),
    ("DESC_CONTAINS", "contains an object that %1%", "does not contain an object that %1%"),
    (
        "DESC_CONTAINED_BY",
        "is contained by an object that %1%",
        "is not contained by an object that %1%",
    ),
    (
        "DESC_ORDERED_BOMBARDED",
        "is ordered bombarded by an object that %1%",
        "is not ordered bombarded by an object that %1%",
    ),
    (
        "DESC_FLEET_SUPPLYABLE",
        "is fleet supplyable by empire %1%",
        "is not fleet supplyable by empire %1%",
    ),
    (
        "DESC_RESOURCE_SUPPLY_CONNECTED",
        "is supply connected by empire %1% to an object that %2%",
        "is not supply connected by empire %1% to an object that %2%",
    ),
];

/// Fill the template for `key` with `args`; unknown keys render as the key
pub fn describe(key: &str, negated: bool, args: &[String]) -> String {
    let Some(&(_, positive, negative)) = TEMPLATES.iter().find(|(k, _, _)| *k == key) else {
        tracing::warn!(key, "Missing description template");
        return key.to_string();
    };
    let template = if negated { negative } else { positive };

    let mut text = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        text = text.replace(&format!("%{}%", i + 1), arg);
    }
    text
}

/// Leading whitespace for a dump line at `level`
pub fn indent(level: usize) -> String {
    "    ".repeat(level)
}

/// Render a name list the way scripts write it: a bare item or `[ a b ]`
pub fn list<T: AsRef<str>>(items: &[T]) -> String {
    match items {
        [single] => single.as_ref().to_string(),
        _ => {
            let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
            format!("[ {} ]", joined.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_substituted() {
        let text = describe("DESC_TURN", false, &["5".into(), "7".into()]);
        assert_eq!(text, "the current turn is between 5 and 7");
    }

    #[test]
    fn test_negated_template() {
        let text = describe("DESC_HAS_TAG", true, &["ROBOTIC".into()]);
        assert_eq!(text, "does not have the tag ROBOTIC");
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(describe("DESC_MISSING", false, &[]), "DESC_MISSING");
    }

    #[test]
    fn test_every_template_has_unique_key() {
        let mut keys: Vec<&str> = TEMPLATES.iter().map(|(k, _, _)| *k).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), TEMPLATES.len());
    }

    #[test]
    fn test_list_rendering() {
        assert_eq!(list(&["A"]), "A");
        assert_eq!(list(&["A", "B"]), "[ A B ]");
        assert_eq!(list::<&str>(&[]), "[  ]");
    }
}
