//! Top-level owner of one survey session.
//!
//! A [`SurveyEstimator`] bundles the three long-lived pieces of a session:
//! the test-point store, the processing pipeline with its results, and the
//! progress-message catalog. Nothing here is global; two estimators never
//! share state.

use log::info;

use crate::config::ChannelMap;
use crate::core::dataset::ChannelTable;
use crate::messages::{MessageCatalog, MessageId, MessageVars};
use crate::processors::pipeline::{
    PointState, ProcessError, ReprocessPolicy, SurveyPipeline, SurveySolver,
};
use crate::processors::store::{StoreError, TestPoint, TestPointStore};

/// One self-survey calibration session.
///
/// Construction announces the initialization banner and the configured
/// channel names once; every later message is tied to a specific operation.
pub struct SurveyEstimator<S: SurveySolver> {
    store: TestPointStore,
    pipeline: SurveyPipeline<S>,
    catalog: MessageCatalog,
}

impl<S: SurveySolver> SurveyEstimator<S> {
    /// Creates an estimator with the default reprocess policy.
    pub fn new(names: ChannelMap, solver: S) -> Self {
        Self::with_policy(names, solver, ReprocessPolicy::default())
    }

    /// Creates an estimator with an explicit reprocess policy.
    pub fn with_policy(names: ChannelMap, solver: S, policy: ReprocessPolicy) -> Self {
        let catalog = MessageCatalog::new(&names);
        catalog.emit(MessageId::Initialize, None);
        catalog.emit(MessageId::Settings, None);
        info!(
            "survey estimator initialized with {} mapped channels",
            names.len()
        );

        Self {
            store: TestPointStore::new(names.clone()),
            pipeline: SurveyPipeline::with_policy(names, solver, policy),
            catalog,
        }
    }

    /// Adds one test point and returns its derived label.
    ///
    /// On success the new-point and point-info messages are emitted, in that
    /// order. On failure nothing is emitted and the store is unchanged.
    pub fn add_test_point(
        &mut self,
        source_id: &str,
        data: ChannelTable,
    ) -> Result<String, StoreError> {
        let point = self.store.add(source_id, data)?;
        let label = point.label.clone();
        let fields = point.summary.display_fields();

        self.catalog
            .emit(MessageId::NewPoint, Some(&MessageVars::Scalar(label.clone())));
        self.catalog
            .emit(MessageId::PointInfo, Some(&MessageVars::Fields(fields)));
        Ok(label)
    }

    /// Returns the stored test point for a label.
    pub fn point(&self, label: &str) -> Result<&TestPoint, StoreError> {
        self.store.get(label)
    }

    /// Returns all stored labels in insertion order.
    pub fn labels(&self) -> Vec<String> {
        self.store.list()
    }

    /// Returns the number of stored test points.
    pub fn num_test_points(&self) -> usize {
        self.store.count()
    }

    /// Processes stored test points; `None` means all, in insertion order.
    pub fn process_all(&mut self, labels: Option<&[String]>) -> Result<(), ProcessError> {
        self.pipeline.process_all(&self.store, &self.catalog, labels)
    }

    /// Processes a single test point by label.
    pub fn process_one(&mut self, label: &str) -> Result<(), ProcessError> {
        self.pipeline.process_one(&self.store, &self.catalog, label)
    }

    /// Returns the survey result stored for a label.
    pub fn get_result(&self, label: &str) -> Result<&S::Output, ProcessError> {
        self.pipeline.get_result(label)
    }

    /// Returns results for several labels; `None` means all stored points.
    pub fn get_results(&self, labels: Option<&[String]>) -> Result<Vec<&S::Output>, ProcessError> {
        self.pipeline.get_results(&self.store, labels)
    }

    /// Returns the processing state of a label.
    pub fn state(&self, label: &str) -> PointState {
        self.pipeline.state(label)
    }

    /// Returns the number of stored survey results.
    pub fn num_results(&self) -> usize {
        self.pipeline.result_count()
    }

    /// Returns the underlying test-point store.
    pub fn store(&self) -> &TestPointStore {
        &self.store
    }

    /// Returns the message catalog used by this session.
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Channel;
    use crate::core::loader::load_channel_csv;
    use crate::processors::pipeline::ChannelSet;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    struct Survey {
        samples: usize,
        mean_height: f64,
    }

    struct HeightSolver;

    impl SurveySolver for HeightSolver {
        type Output = Survey;

        fn survey(&self, channels: &ChannelSet<'_>) -> anyhow::Result<Survey> {
            let n = channels.num_samples();
            Ok(Survey {
                samples: n,
                mean_height: channels.geometric_height.iter().sum::<f64>() / n as f64,
            })
        }
    }

    fn full_table(n: usize) -> ChannelTable {
        let mut table = ChannelTable::new();
        for channel in Channel::ALL {
            table.insert(channel.name(), vec![0.0; n]);
        }
        table.insert("total pressure", vec![2200.0; n]);
        table.insert("static pressure", vec![2116.8; n]);
        table.insert("geometric height", vec![5000.0; n]);
        table
    }

    fn estimator() -> SurveyEstimator<HeightSolver> {
        SurveyEstimator::new(ChannelMap::identity(), HeightSolver)
    }

    #[test]
    fn test_add_derives_label_and_summarizes() {
        let mut estimator = estimator();
        let label = estimator
            .add_test_point("data/flight1.csv", full_table(3))
            .unwrap();

        assert_eq!(label, "flight1");
        assert_eq!(estimator.num_test_points(), 1);

        let point = estimator.point("flight1").unwrap();
        assert_eq!(point.summary.alt_min_ft, 5000.0);
        assert!(!point.summary.is_turning());
    }

    #[test]
    fn test_duplicate_add_keeps_first_entry() {
        let mut estimator = estimator();
        estimator
            .add_test_point("flight1.csv", full_table(3))
            .unwrap();
        let original = estimator.point("flight1").unwrap().clone();

        let err = estimator
            .add_test_point("other/flight1.csv", full_table(5))
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateLabel(_)));
        assert_eq!(estimator.num_test_points(), 1);
        assert_eq!(estimator.point("flight1").unwrap(), &original);
    }

    #[test]
    fn test_result_unavailable_before_processing() {
        let mut estimator = estimator();
        estimator
            .add_test_point("flight1.csv", full_table(2))
            .unwrap();

        assert_eq!(estimator.state("flight1"), PointState::Unprocessed);
        assert!(matches!(
            estimator.get_result("flight1"),
            Err(ProcessError::NotProcessed(_))
        ));
    }

    #[test]
    fn test_process_subset_only() {
        let mut estimator = estimator();
        estimator
            .add_test_point("tp_01.csv", full_table(1))
            .unwrap();
        estimator
            .add_test_point("tp_02.csv", full_table(2))
            .unwrap();

        let subset = vec!["tp_01".to_string()];
        estimator.process_all(Some(&subset)).unwrap();

        assert_eq!(estimator.num_results(), 1);
        assert_eq!(estimator.state("tp_02"), PointState::Unprocessed);
    }

    #[test]
    fn test_full_session_from_csv_files() {
        let dir = TempDir::new().unwrap();
        let header = "QCIC,PSIC,TAT,AOA,AOS,VN,VE,VD,ZGPS,PHI,THETA,PSI";
        fs::write(
            dir.path().join("flight1.csv"),
            format!(
                "{header}\n\
                 2116.8,2116.8,288.15,0.01,0.0,200.0,10.0,-1.0,5000.0,0.0,0.02,1.57\n\
                 2250.0,2116.8,288.15,0.02,0.0,210.0,12.0,-1.2,5200.0,0.3,0.02,1.58\n"
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("flight2.csv"),
            format!(
                "{header}\n\
                 2180.0,2116.8,287.00,0.01,0.0,195.0,9.0,-0.8,9800.0,0.0,0.02,0.79\n"
            ),
        )
        .unwrap();

        let names = ChannelMap::from_pairs([
            ("total pressure", "QCIC"),
            ("static pressure", "PSIC"),
            ("total temperature", "TAT"),
            ("angle of attack", "AOA"),
            ("angle of sideslip", "AOS"),
            ("north velocity", "VN"),
            ("east velocity", "VE"),
            ("down velocity", "VD"),
            ("geometric height", "ZGPS"),
            ("roll angle", "PHI"),
            ("pitch angle", "THETA"),
            ("true heading", "PSI"),
        ])
        .unwrap();
        let mut estimator = SurveyEstimator::new(names, HeightSolver);

        for name in ["flight1.csv", "flight2.csv"] {
            let path = dir.path().join(name);
            let table = load_channel_csv(&path).unwrap();
            estimator
                .add_test_point(path.to_str().unwrap(), table)
                .unwrap();
        }

        assert_eq!(estimator.labels(), vec!["flight1", "flight2"]);
        // The second sample of flight1 banks 0.3 rad, well past the turn
        // threshold.
        assert!(estimator.point("flight1").unwrap().summary.is_turning());
        assert!(!estimator.point("flight2").unwrap().summary.is_turning());

        estimator.process_all(None).unwrap();

        assert_eq!(estimator.num_results(), 2);
        let first = estimator.get_result("flight1").unwrap();
        assert_eq!(first.samples, 2);
        assert!((first.mean_height - 5100.0).abs() < 1e-9);

        let results = estimator.get_results(None).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].samples, 1);

        // Reprocessing under the default policy is idempotent.
        let before = estimator.get_result("flight1").unwrap().clone();
        estimator.process_one("flight1").unwrap();
        assert_eq!(estimator.get_result("flight1").unwrap(), &before);
        assert_eq!(estimator.num_results(), 2);
    }

    #[test]
    fn test_unknown_point_lookup() {
        let estimator = estimator();
        assert!(matches!(
            estimator.point("nope"),
            Err(StoreError::UnknownLabel(_))
        ));
    }
}
