//! Canonical ordering of LDML elements and attributes.
//!
//! The tables follow the CLDR canonical form document. They rank element
//! names, attribute names, and for a handful of `element/attribute` pairs
//! the attribute values as well. Names the tables do not know sort last;
//! callers that merge streams rely on encounter order for ties, so nothing
//! here invents a secondary key.

use std::cmp::Ordering;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

/// Compare two element names. `special` sorts after everything, even after
/// elements the table does not know.
pub fn compare_element_names(x: &str, y: &str) -> Ordering {
    if x == "special" && y != "special" {
        return Ordering::Greater;
    }
    if y == "special" && x != "special" {
        return Ordering::Less;
    }
    element_rank(x).cmp(&element_rank(y))
}

/// Compare two attribute names.
pub fn compare_attribute_names(x: &str, y: &str) -> Ordering {
    attribute_rank(x).cmp(&attribute_rank(y))
}

/// Compare two values of the attribute `attribute` on the element `element`.
///
/// A value order table is consulted first when one exists for the pair.
/// Numeric values come before non-numeric ones and compare numerically;
/// remaining ties compare as plain strings.
pub fn compare_attribute_values(element: &str, attribute: &str, x: &str, y: &str) -> Ordering {
    if let Some(table) = value_order(element, attribute) {
        let ranked = table_rank(table, x).cmp(&table_rank(table, y));
        if ranked != Ordering::Equal {
            return ranked;
        }
    }
    let x_number = x.parse::<f64>().ok();
    let y_number = y.parse::<f64>().ok();
    let numeric = match (x_number, y_number) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if numeric != Ordering::Equal {
        return numeric;
    }
    x.cmp(y)
}

/// Compare two elements with their attributes.
///
/// Names compare first. Equal names compare attribute lists pairwise in
/// document position, each pair by name and then by value, and finally by
/// attribute count.
pub fn compare_elements(
    x_name: &str,
    x_attributes: &[(String, String)],
    y_name: &str,
    y_attributes: &[(String, String)],
) -> Ordering {
    let by_name = compare_element_names(x_name, y_name);
    if by_name != Ordering::Equal {
        return by_name;
    }
    for ((x_attr, x_value), (y_attr, y_value)) in x_attributes.iter().zip(y_attributes) {
        let by_attr = compare_attribute_names(x_attr, y_attr);
        if by_attr != Ordering::Equal {
            return by_attr;
        }
        let by_value = compare_attribute_values(x_name, x_attr, x_value, y_value);
        if by_value != Ordering::Equal {
            return by_value;
        }
    }
    x_attributes.len().cmp(&y_attributes.len())
}

fn element_rank(name: &str) -> usize {
    static RANKS: OnceLock<FxHashMap<&'static str, usize>> = OnceLock::new();
    let ranks = RANKS.get_or_init(|| build_rank_map(ELEMENT_ORDER));
    ranks.get(name).copied().unwrap_or(usize::MAX)
}

fn attribute_rank(name: &str) -> usize {
    static RANKS: OnceLock<FxHashMap<&'static str, usize>> = OnceLock::new();
    let ranks = RANKS.get_or_init(|| build_rank_map(ATTRIBUTE_ORDER));
    ranks.get(name).copied().unwrap_or(usize::MAX)
}

fn build_rank_map(names: &'static [&'static str]) -> FxHashMap<&'static str, usize> {
    names.iter().enumerate().map(|(rank, name)| (*name, rank)).collect()
}

fn value_order(element: &str, attribute: &str) -> Option<&'static [&'static str]> {
    match (element, attribute) {
        ("weekendStart", "day") | ("weekendEnd", "day") | ("day", "type") => Some(WEEKDAYS),
        ("dateFormatLength", "type")
        | ("timeFormatLength", "type")
        | ("dateTimeFormatLength", "type")
        | ("decimalFormatLength", "type")
        | ("scientificFormatLength", "type")
        | ("percentFormatLength", "type")
        | ("currencyFormatLength", "type") => Some(FORMAT_LENGTHS),
        ("monthWidth", "type") | ("dayWidth", "type") => Some(WIDTHS),
        ("field", "type") => Some(FIELDS),
        _ => None,
    }
}

fn table_rank(table: &[&str], value: &str) -> usize {
    table.iter().position(|entry| *entry == value).unwrap_or(usize::MAX)
}

const WEEKDAYS: &[&str] = &["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

const FORMAT_LENGTHS: &[&str] = &["full", "long", "medium", "short"];

const WIDTHS: &[&str] = &["wide", "abbreviated", "narrow"];

const FIELDS: &[&str] = &[
    "era", "year", "month", "week", "day", "weekday", "dayperiod", "hour", "minute", "second",
    "zone",
];

#[rustfmt::skip]
const ELEMENT_ORDER: &[&str] = &[
    "ldml", "alternate", "attributeOrder", "attributes", "blockingItems", "calendarSystem",
    "character", "character-fallback", "codePattern", "codesByTerritory", "comment", "context",
    "cp", "deprecatedItems", "distinguishingItems", "elementOrder", "first_variable", "fractions",
    "identity", "info", "languageAlias", "languageCodes", "languageCoverage", "languagePopulation",
    "last_variable", "first_tertiary_ignorable", "last_tertiary_ignorable",
    "first_secondary_ignorable", "last_secondary_ignorable", "first_primary_ignorable",
    "last_primary_ignorable", "first_non_ignorable", "last_non_ignorable", "first_trailing",
    "last_trailing", "likelySubtag", "mapTimezones", "mapZone", "pluralRule", "pluralRules",
    "reference", "region", "scriptAlias", "scriptCoverage", "serialElements", "substitute",
    "suppress", "tRule", "telephoneCountryCode", "territoryAlias", "territoryCodes",
    "territoryCoverage", "currencyCoverage", "timezone", "timezoneCoverage", "transform",
    "usesMetazone", "validity", "alias", "appendItem", "base", "beforeCurrency", "afterCurrency",
    "currencyMatch", "dateFormatItem", "day", "deprecated", "distinguishing", "blocking",
    "coverageAdditions", "era", "eraNames", "eraAbbr", "eraNarrow", "exemplarCharacters",
    "fallback", "field", "generic", "greatestDifference", "height", "hourFormat", "hoursFormat",
    "gmtFormat", "intervalFormatFallback", "intervalFormatItem", "key", "localeDisplayNames",
    "layout", "localeDisplayPattern", "languages", "localePattern", "localeSeparator",
    "localizedPatternChars", "dateRangePattern", "calendars", "long", "mapping",
    "measurementSystem", "measurementSystemName", "messages", "minDays", "firstDay", "month",
    "months", "monthNames", "monthAbbr", "days", "dayNames", "dayAbbr", "orientation", "inList",
    "inText", "paperSize", "pattern", "displayName", "quarter", "quarters", "quotationStart",
    "quotationEnd", "alternateQuotationStart", "alternateQuotationEnd", "regionFormat",
    "fallbackFormat", "abbreviationFallback", "preferenceOrdering", "relative", "reset", "p", "pc",
    "rule", "s", "sc", "scripts", "segmentation", "settings", "short", "commonlyUsed",
    "exemplarCity", "singleCountries", "default", "calendar", "collation", "currency",
    "currencyFormat", "currencySpacing", "currencyFormatLength", "dateFormat", "dateFormatLength",
    "dateTimeFormat", "dateTimeFormatLength", "availableFormats", "appendItems", "dayContext",
    "dayWidth", "decimalFormat", "decimalFormatLength", "intervalFormats", "monthContext",
    "monthWidth", "percentFormat", "percentFormatLength", "quarterContext", "quarterWidth",
    "scientificFormat", "scientificFormatLength", "skipDefaultLocale", "defaultContent",
    "standard", "daylight", "suppress_contractions", "optimize", "rules", "surroundingMatch",
    "insertBetween", "symbol", "decimal", "group", "list", "percentSign", "nativeZeroDigit",
    "patternDigit", "plusSign", "minusSign", "exponential", "perMille", "infinity", "nan",
    "currencyDecimal", "currencyGroup", "symbols", "decimalFormats", "scientificFormats",
    "percentFormats", "currencyFormats", "currencies", "t", "tc", "q", "qc", "i", "ic", "extend",
    "territories", "timeFormat", "timeFormatLength", "timeZoneNames", "type", "unit",
    "unitPattern", "unitName", "variable", "attributeValues", "variables", "segmentRules",
    "variantAlias", "variants", "keys", "types", "measurementSystemNames", "codePatterns",
    "version", "generation", "currencyData", "language", "script", "territory",
    "territoryContainment", "languageData", "territoryInfo", "calendarData", "variant", "week",
    "am", "pm", "eras", "dateFormats", "timeFormats", "dateTimeFormats", "fields", "weekData",
    "measurementData", "timezoneData", "characters", "delimiters", "measurement", "dates",
    "numbers", "transforms", "metadata", "codeMappings", "likelySubtags", "metazoneInfo",
    "plurals", "telephoneCodeData", "units", "collations", "posix", "segmentations", "references",
    "weekendStart", "weekendEnd", "width", "x", "yesstr", "nostr", "yesexpr", "noexpr", "zone",
    "metazone", "special", "zoneAlias", "zoneFormatting", "zoneItem", "supplementalData",
];

#[rustfmt::skip]
const ATTRIBUTE_ORDER: &[&str] = &[
    "_q", "type", "id", "choice", "key", "registry", "source", "target", "path", "day", "date",
    "version", "count", "lines", "characters", "iso4217", "before", "from", "to", "mzone",
    "number", "time", "casing", "list", "uri", "digits", "rounding", "iso3166", "hex", "request",
    "direction", "alternate", "backwards", "caseFirst", "caseLevel", "hiraganaQuarternary",
    "hiraganaQuaternary", "variableTop", "normalization", "numeric", "strength", "elements",
    "element", "attributes", "attribute", "aliases", "attributeValue", "contains", "multizone",
    "order", "other", "replacement", "scripts", "services", "territories", "territory",
    "tzidVersion", "value", "values", "variant", "variants", "visibility", "alpha3", "code",
    "end", "exclude", "fips10", "gdp", "internet", "literacyPercent", "locales", "officialStatus",
    "population", "populationPercent", "start", "used", "writingPercent", "validSubLocales",
    "standard", "references", "alt", "draft",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_children_are_in_document_order() {
        for window in ["version", "generation", "language", "script", "territory", "variant"]
            .windows(2)
        {
            assert_eq!(
                compare_element_names(window[0], window[1]),
                Ordering::Less,
                "{} should sort before {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn special_sorts_after_everything() {
        assert_eq!(compare_element_names("special", "zoneItem"), Ordering::Greater);
        assert_eq!(compare_element_names("identity", "special"), Ordering::Less);
        assert_eq!(compare_element_names("special", "special"), Ordering::Equal);
        // even after a name the table has never heard of
        assert_eq!(compare_element_names("notAnLdmlElement", "special"), Ordering::Less);
    }

    #[test]
    fn unknown_elements_sort_last_among_ranked() {
        assert_eq!(compare_element_names("identity", "notAnLdmlElement"), Ordering::Less);
        assert_eq!(
            compare_element_names("notAnLdmlElement", "alsoUnknown"),
            Ordering::Equal
        );
    }

    #[test]
    fn type_attribute_comes_first() {
        assert_eq!(compare_attribute_names("type", "value"), Ordering::Less);
        assert_eq!(compare_attribute_names("alt", "draft"), Ordering::Less);
        assert_eq!(compare_attribute_names("draft", "type"), Ordering::Greater);
    }

    #[test]
    fn weekday_values_use_the_table() {
        assert_eq!(
            compare_attribute_values("day", "type", "sun", "mon"),
            Ordering::Less
        );
        assert_eq!(
            compare_attribute_values("weekendStart", "day", "sun", "sat"),
            Ordering::Less
        );
        // outside the keyed pairs the table does not apply
        assert_eq!(
            compare_attribute_values("collation", "type", "sun", "mon"),
            Ordering::Greater
        );
    }

    #[test]
    fn numeric_values_compare_numerically() {
        assert_eq!(compare_attribute_values("version", "number", "9", "10"), Ordering::Less);
        assert_eq!(
            compare_attribute_values("version", "number", "2", "draft"),
            Ordering::Less
        );
        assert_eq!(
            compare_attribute_values("version", "number", "draft", "2"),
            Ordering::Greater
        );
    }

    #[test]
    fn elements_with_equal_names_compare_by_attributes() {
        let x = [("type".to_string(), "standard".to_string())];
        let y = [
            ("type".to_string(), "standard".to_string()),
            ("alt".to_string(), "proposed".to_string()),
        ];
        assert_eq!(compare_elements("collation", &x, "collation", &y), Ordering::Less);
        assert_eq!(compare_elements("collation", &x, "collation", &x), Ordering::Equal);

        let a = [("type".to_string(), "a".to_string())];
        let b = [("type".to_string(), "b".to_string())];
        assert_eq!(compare_elements("collation", &a, "collation", &b), Ordering::Less);
    }
}
