use ndarray::Array1;

/// `true` for every name containing `pattern`, ignoring case.
pub fn mega_labels(names: &[String], pattern: &str) -> Array1<bool> {
    let pattern = pattern.to_lowercase();
    names
        .iter()
        .map(|name| name.to_lowercase().contains(&pattern))
        .collect()
}

/// Counts of `(negative, positive)` labels.
pub fn class_counts(labels: &Array1<bool>) -> (usize, usize) {
    let positives = labels.iter().filter(|&&l| l).count();
    (labels.len() - positives, positives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_substring_in_any_case() {
        let labels = mega_labels(
            &names(&["CharizardMega Charizard X", "MEGANIUM", "omegaman", "Pikachu", ""]),
            "Mega",
        );
        assert_eq!(labels.to_vec(), vec![true, true, true, false, false]);
    }

    #[test]
    fn primal_forms_are_not_positives() {
        let labels = mega_labels(&names(&["GroudonPrimal Groudon"]), "Mega");
        assert!(!labels[0]);
    }

    #[test]
    fn counts_both_classes() {
        let labels = mega_labels(&names(&["Mega A", "B", "C"]), "mega");
        assert_eq!(class_counts(&labels), (2, 1));
    }
}
