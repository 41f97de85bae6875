use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::{class_key, lift_rank, Record};

/// Heaviest record for each (weight class, lift) pair.
///
/// Ties at the maximum weight go to the record seen first in `records`.
/// Output is ordered by weight class (numeric ascending, non-numeric after),
/// then lift (Squat, Bench, Deadlift, Total, others).
pub fn best_per_class_and_lift<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut best: HashMap<(&'a str, &'a str), &'a Record> = HashMap::new();

    for record in records {
        let key = (record.weight_class.as_str(), record.lift.as_str());
        match best.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if record.weight > slot.get().weight {
                    slot.insert(record);
                }
            }
        }
    }

    let mut rows: Vec<&Record> = best.into_values().collect();
    rows.sort_by(|a, b| group_order(a, b));
    rows
}

fn group_order(a: &Record, b: &Record) -> Ordering {
    class_key(&a.weight_class)
        .cmp(&class_key(&b.weight_class))
        .then_with(|| lift_rank(&a.lift).cmp(&lift_rank(&b.lift)))
        .then_with(|| a.lift.cmp(&b.lift))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, weight: f64, class: &str, lift: &str) -> Record {
        Record {
            full_name: name.into(),
            weight,
            weight_class: class.into(),
            lift: lift.into(),
            ..Default::default()
        }
    }

    fn summary(rows: &[&Record]) -> Vec<(String, f64, String, String)> {
        rows.iter()
            .map(|r| (r.full_name.clone(), r.weight, r.weight_class.clone(), r.lift.clone()))
            .collect()
    }

    #[test]
    fn picks_heaviest_per_group() {
        let records = vec![
            rec("A", 200.0, "90", "Squat"),
            rec("B", 250.0, "90", "Squat"),
            rec("C", 150.0, "100", "Bench"),
        ];
        let best = best_per_class_and_lift(&records);
        assert_eq!(
            summary(&best),
            vec![
                ("B".into(), 250.0, "90".into(), "Squat".into()),
                ("C".into(), 150.0, "100".into(), "Bench".into()),
            ]
        );
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let records = vec![
            rec("First", 200.0, "90", "Squat"),
            rec("Second", 200.0, "90", "Squat"),
            rec("Light", 150.0, "90", "Squat"),
        ];
        let best = best_per_class_and_lift(&records);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].full_name, "First");
    }

    #[test]
    fn orders_by_class_then_lift() {
        let records = vec![
            rec("a", 1.0, "SHW", "Squat"),
            rec("b", 1.0, "100", "Total"),
            rec("c", 1.0, "100", "Squat"),
            rec("d", 1.0, "90", "Log Press"),
            rec("e", 1.0, "90", "Deadlift"),
            rec("f", 1.0, "90", "Bench"),
            rec("g", 1.0, "140+", "Bench"),
            rec("h", 1.0, "90", ""),
        ];
        let best = best_per_class_and_lift(&records);
        let order: Vec<&str> = best.iter().map(|r| r.full_name.as_str()).collect();
        // Unknown lifts after Total, ordered by label ("" < "Log Press")
        assert_eq!(order, vec!["f", "e", "h", "d", "c", "b", "g", "a"]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let records: Vec<Record> = Vec::new();
        assert!(best_per_class_and_lift(&records).is_empty());
    }

    #[test]
    fn idempotent() {
        let records = vec![
            rec("A", 200.0, "90", "Squat"),
            rec("B", 250.0, "90", "Squat"),
            rec("C", 150.0, "100", "Bench"),
            rec("D", 155.0, "100", "Bench"),
        ];
        let once = best_per_class_and_lift(&records);
        let twice = best_per_class_and_lift(once.iter().copied());
        assert_eq!(once, twice);
    }
}
