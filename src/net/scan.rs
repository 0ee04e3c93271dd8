use super::{AccessPointBrief, AccessPointList};
use crate::config::MAX_ACCESS_POINTS;

/// Reduce raw scan records to the list shown on the Wi-Fi list page.
///
/// Hidden networks (empty SSID) are skipped and duplicate SSIDs (several
/// BSSIDs of one network) collapse into the strongest entry. When more than
/// `max` networks remain, the weakest are dropped. The result is ordered by
/// descending RSSI.
pub fn collect_access_points<I>(records: I, max: usize) -> AccessPointList
where
    I: IntoIterator<Item = AccessPointBrief>,
{
    let max = max.min(MAX_ACCESS_POINTS);
    let mut found = AccessPointList::new();

    for record in records {
        if record.ssid.is_empty() {
            continue;
        }

        if let Some(seen) = found.iter_mut().find(|ap| ap.ssid == record.ssid) {
            if record.rssi > seen.rssi {
                *seen = record;
            }
            continue;
        }

        if found.len() < max {
            let _ = found.push(record);
        } else if let Some(weakest) = found.iter_mut().min_by_key(|ap| ap.rssi) {
            if record.rssi > weakest.rssi {
                *weakest = record;
            }
        }
    }

    found.sort_unstable_by(|a, b| b.rssi.cmp(&a.rssi));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(ssid: &str, rssi: i8) -> AccessPointBrief {
        AccessPointBrief::new(ssid, rssi, true)
    }

    #[test]
    fn hidden_networks_are_skipped() {
        let list = collect_access_points([ap("", -30), ap("cafe", -60)], 10);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ssid.as_str(), "cafe");
    }

    #[test]
    fn duplicates_keep_strongest_signal() {
        let list = collect_access_points([ap("mesh", -80), ap("mesh", -50), ap("mesh", -70)], 10);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].rssi, -50);
    }

    #[test]
    fn sorted_strongest_first() {
        let list = collect_access_points([ap("a", -90), ap("b", -40), ap("c", -65)], 10);
        let order: std::vec::Vec<&str> = list.iter().map(|ap| ap.ssid.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn truncates_to_max_dropping_weakest() {
        let list = collect_access_points([ap("a", -90), ap("b", -40), ap("c", -65)], 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ssid.as_str(), "b");
        assert_eq!(list[1].ssid.as_str(), "c");
    }

    #[test]
    fn max_is_capped_by_list_capacity() {
        let names = [
            "n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7", "n8", "n9", "n10", "n11",
        ];
        let records = names.iter().enumerate().map(|(i, n)| ap(n, -(i as i8) - 30));
        let list = collect_access_points(records, 50);
        assert_eq!(list.len(), 10);
        assert_eq!(list[9].ssid.as_str(), "n9");
    }
}
