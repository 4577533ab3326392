//! Final cluster report: one line per cluster, `"<index>: <id>, <id> "`,
//! 1-based index, members ascending. A JSON summary of the run can be
//! written next to it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use serde::Serialize;
use crate::cluster::ClusteringOutcome;
use crate::error::Result;
use crate::types::{Cluster, Diagnostic, EcoregionId, SimilarPair, SimilarityThresholds};

pub fn format_line(index: usize, cluster: &Cluster) -> String {
    let members: Vec<String> = cluster.sorted().iter().map(|id| id.to_string()).collect();
    format!("{}: {} \n", index, members.join(", "))
}

pub fn format_report(clusters: &[Cluster]) -> String {
    clusters.iter()
        .enumerate()
        .map(|(k, cluster)| format_line(k + 1, cluster))
        .collect()
}

pub fn write_report<P: AsRef<Path>>(path: P, clusters: &[Cluster]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(format_report(clusters).as_bytes())?;
    writer.flush()?;
    info!("wrote ecoregion clusters to {:?}", path.as_ref());
    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryCluster {
    index: usize,
    members: Vec<EcoregionId>,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    thresholds: &'a SimilarityThresholds,
    pairs: &'a [SimilarPair],
    clusters: Vec<SummaryCluster>,
    diagnostics: &'a [Diagnostic],
}

pub fn write_summary<P: AsRef<Path>>(path: P, outcome: &ClusteringOutcome) -> Result<()> {
    let summary = Summary {
        thresholds: &outcome.thresholds,
        pairs: &outcome.pairs,
        clusters: outcome.clusters.iter()
            .enumerate()
            .map(|(k, cluster)| SummaryCluster { index: k + 1, members: cluster.sorted() })
            .collect(),
        diagnostics: &outcome.diagnostics,
    };
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writer.flush()?;
    info!("wrote clustering summary to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(codes: &[u32]) -> Cluster {
        codes.iter().map(|&c| EcoregionId(c)).collect()
    }

    #[test]
    fn multi_member_line_is_sorted_with_trailing_space() {
        assert_eq!(format_line(3, &cluster(&[222, 212, 251])), "3: 212, 222, 251 \n");
    }

    #[test]
    fn singleton_line() {
        assert_eq!(format_line(1, &cluster(&[331])), "1: 331 \n");
    }

    #[test]
    fn report_numbers_from_one() {
        let report = format_report(&[cluster(&[2, 1]), cluster(&[9])]);
        assert_eq!(report, "1: 1, 2 \n2: 9 \n");
    }

    #[test]
    fn summary_is_complete_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let outcome = ClusteringOutcome {
            thresholds: SimilarityThresholds { mean: 0.5, std: 0.1, lower: 0.33, upper: 0.6 },
            pairs: vec![SimilarPair { distance: 0.2, first: EcoregionId(1), second: EcoregionId(2) }],
            clusters: vec![cluster(&[2, 1]), cluster(&[3])],
            diagnostics: Vec::new(),
        };
        write_summary(&path, &outcome).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["clusters"][0]["members"], serde_json::json!([1, 2]));
        assert_eq!(value["clusters"][1]["index"], serde_json::json!(2));
        assert_eq!(value["pairs"][0]["second"], serde_json::json!(2));
    }

    #[test]
    fn written_report_is_stable_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let clusters = vec![cluster(&[5, 3, 4]), cluster(&[1, 2]), cluster(&[6])];
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        write_report(&first, &clusters).unwrap();
        write_report(&second, &clusters).unwrap();
        let a = std::fs::read(&first).unwrap();
        let b = std::fs::read(&second).unwrap();
        assert_eq!(a, b);
        assert_eq!(String::from_utf8(a).unwrap(), "1: 3, 4, 5 \n2: 1, 2 \n3: 6 \n");
    }
}
