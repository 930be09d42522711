//! Experiment driver: repeats trials per desired hole count and reports success rates.
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::experiment::cache::DatasetCache;
use crate::experiment::config::ExperimentConfig;
use crate::experiment::events::{EventSink, ExperimentEvent, ExperimentEventKind};
use crate::experiment::results::ResultRow;
use crate::field::{Field, FieldKind};
use crate::layout::Layout;
use crate::random::seed_from_clock;
use crate::treasure::TreasureShape;

/// Result of an experiment run.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentSummary {
    /// Seed the run's RNG was created from.
    pub seed: u64,
    /// Emitted rows, one per distinct layout.
    pub rows: Vec<ResultRow>,
    /// Trials played, including the single trial of each skipped hole count.
    pub trials: usize,
    /// Desired hole counts skipped because they repeated the previous layout.
    pub skipped: usize,
    /// Layout anomalies reported.
    pub warnings: usize,
    /// The stop threshold was reached before `max_holes`.
    pub stopped_early: bool,
}

/// Running totals for one desired hole count.
#[derive(Default)]
struct Tally {
    actual_holes: Option<usize>,
    successes: usize,
    artefacts: usize,
    holes_succeeded: usize,
}

pub struct ExperimentRunner {
    /// Configuration applied to this runner.
    config: ExperimentConfig,
    /// Dataset cache used to reuse parsed treasures.
    cache: DatasetCache,
}

impl ExperimentRunner {
    pub fn try_new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: DatasetCache::new(),
        })
    }

    /// Uses `cache` for dataset lookups, so several runs share parsed files.
    pub fn with_cache(mut self, cache: DatasetCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn into_cache(self) -> DatasetCache {
        self.cache
    }

    /// Runs the configured layout, returning the summary.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> Result<ExperimentSummary> {
        let spec = self.config.layout;
        let hole_size = self.config.hole_size;
        self.run_with(|holes| spec.build(hole_size, holes), sink)
    }

    /// Runs with layouts built by `make_layout` for each desired hole count.
    pub fn run_with<F, L>(
        &mut self,
        mut make_layout: F,
        sink: &mut dyn EventSink,
    ) -> Result<ExperimentSummary>
    where
        F: FnMut(usize) -> L,
        L: Layout,
    {
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        let mut rng = StdRng::seed_from_u64(seed);
        let shape = config.treasure.resolve(&mut self.cache)?;
        let kind = FieldKind::for_shape(&shape);
        let point_cloud = matches!(shape, TreasureShape::PointCloud(_));
        let layout_name = make_layout(config.start_holes).name();

        info!(
            layout = layout_name,
            treasure = shape.name(),
            field = config.field_size,
            hole = config.hole_size,
            repeats = config.repeats,
            seed,
            "experiment started"
        );
        if sink.wants(ExperimentEventKind::RunStarted) {
            sink.send(ExperimentEvent::RunStarted {
                config: config.clone(),
                layout: layout_name,
                seed,
            });
        }

        let mut summary = ExperimentSummary {
            seed,
            ..Default::default()
        };
        let mut last_actual: Option<usize> = None;
        let mut holes = config.start_holes;

        while holes <= config.max_holes {
            let repeats = config.repeats_for(holes);
            let layout = make_layout(holes);
            let mut tally = Tally::default();
            let mut repeated_layout = false;

            for repeat in 0..repeats {
                let mut field = Field::try_new(kind, config.field_size, config.field_size)?;
                field.place_treasure(&shape, &mut rng)?;
                let out = layout.play(&mut field, &mut rng, config.return_after_hit)?;
                summary.trials += 1;

                match tally.actual_holes {
                    None => {
                        tally.actual_holes = Some(out.actual_holes);
                        repeated_layout = last_actual == Some(out.actual_holes);
                        last_actual = Some(out.actual_holes);
                    }
                    Some(expected) if expected != out.actual_holes => {
                        return Err(Error::InconsistentHoleCount {
                            desired: holes,
                            expected,
                            actual: out.actual_holes,
                            repeat,
                        });
                    }
                    Some(_) => {}
                }
                if repeated_layout {
                    break;
                }

                if out.found {
                    tally.successes += 1;
                    if point_cloud {
                        tally.artefacts += out.artefact_count;
                        tally.holes_succeeded += out.holes_succeeded;
                    }
                }

                // The second trial: a repeated layout has already been skipped by now.
                if repeat == 1 {
                    let context = format!("{layout_name} holes={holes}");
                    if out.layout_error {
                        summary.warnings += 1;
                        warn_anomaly(
                            sink,
                            &context,
                            "holes do not fit the field: probably too many holes for the field size",
                        );
                    }
                    if field.border_adjusted() {
                        summary.warnings += 1;
                        warn_anomaly(sink, &context, "holes were moved to stay inside the field");
                    }
                    if config.dump_at_holes == Some(out.actual_holes)
                        && sink.wants(ExperimentEventKind::FieldDumped)
                    {
                        info!(holes, actual = out.actual_holes, "dumping field");
                        sink.send(ExperimentEvent::FieldDumped {
                            desired_holes: holes,
                            actual_holes: out.actual_holes,
                            dump: field.dump()?,
                        });
                    }
                }
            }

            let actual_holes = tally.actual_holes.unwrap_or_default();
            if repeated_layout {
                summary.skipped += 1;
                debug!(holes, actual_holes, "same layout as previous hole count; skipped");
                if sink.wants(ExperimentEventKind::LayoutSkipped) {
                    sink.send(ExperimentEvent::LayoutSkipped {
                        desired_holes: holes,
                        actual_holes,
                    });
                }
            } else {
                let n = repeats as f64;
                let mut row =
                    ResultRow::new(holes, actual_holes, tally.successes as f64 * 100.0 / n);
                if point_cloud {
                    row = row.with_artefacts(
                        tally.artefacts as f64 / n,
                        tally.holes_succeeded as f64 / n,
                    );
                }
                debug!(
                    holes,
                    actual_holes,
                    success_rate = row.success_rate,
                    "row emitted"
                );
                summary.rows.push(row);
                if sink.wants(ExperimentEventKind::RowEmitted) {
                    sink.send(ExperimentEvent::RowEmitted { row });
                }

                if row.success_rate >= config.stop_threshold {
                    info!(
                        holes,
                        actual_holes,
                        success_rate = row.success_rate,
                        "stop threshold reached"
                    );
                    summary.stopped_early = true;
                    break;
                }
            }

            let next = config.next_holes(holes);
            if next == holes {
                break;
            }
            holes = next;
        }

        info!(
            rows = summary.rows.len(),
            trials = summary.trials,
            skipped = summary.skipped,
            "experiment finished"
        );
        if sink.wants(ExperimentEventKind::RunFinished) {
            sink.send(ExperimentEvent::RunFinished {
                summary: summary.clone(),
            });
        }
        Ok(summary)
    }
}

fn warn_anomaly(sink: &mut dyn EventSink, context: &str, message: &str) {
    warn!("{context}: {message}");
    if sink.wants(ExperimentEventKind::Warning) {
        sink.send(ExperimentEvent::Warning {
            context: context.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Write;
    use std::rc::Rc;
    use std::sync::Arc;

    use rand::RngCore;

    use super::*;
    use crate::experiment::config::{LayoutSpec, SmallHoles, TreasureSpec};
    use crate::experiment::events::VecSink;
    use crate::layout::DigOutcome;
    use crate::treasure::polygon::tests::encode_shapefile;
    use crate::treasure::ArtefactCloud;

    /// Reports `actual(holes)` without digging and counts its plays.
    struct Scripted<A: Fn(usize) -> usize> {
        holes: usize,
        actual: A,
        plays: Rc<Cell<usize>>,
    }

    impl<A: Fn(usize) -> usize> Layout for Scripted<A> {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn play(&self, _: &mut Field, _: &mut dyn RngCore, _: bool) -> Result<DigOutcome> {
            self.plays.set(self.plays.get() + 1);
            Ok(DigOutcome {
                actual_holes: (self.actual)(self.holes),
                ..Default::default()
            })
        }
    }

    fn config() -> ExperimentConfig {
        ExperimentConfig::default()
            .with_seed(Some(42))
            .with_repeats(10)
    }

    #[test]
    fn repeated_layouts_emit_nothing_and_play_once() {
        let plays = Rc::new(Cell::new(0));
        let mut runner = ExperimentRunner::try_new(config().with_max_holes(6)).unwrap();
        let mut sink = VecSink::new();
        let summary = runner
            .run_with(
                |holes| Scripted {
                    holes,
                    actual: |h: usize| h.div_ceil(3),
                    plays: plays.clone(),
                },
                &mut sink,
            )
            .unwrap();

        // Actual counts 1 1 1 2 2 2: rows for 1 and 4 desired holes only.
        let desired: Vec<usize> = sink.rows().iter().map(|r| r.desired_holes).collect();
        assert_eq!(desired, vec![1, 4]);
        assert_eq!(summary.skipped, 4);
        assert_eq!(plays.get(), 10 + 1 + 1 + 10 + 1 + 1);
        assert_eq!(summary.trials, plays.get());
        let skipped = sink
            .as_slice()
            .iter()
            .filter(|e| matches!(e, ExperimentEvent::LayoutSkipped { .. }))
            .count();
        assert_eq!(skipped, 4);
    }

    #[test]
    fn inconsistent_hole_count_is_fatal() {
        let counter = Rc::new(Cell::new(0));
        let mut runner = ExperimentRunner::try_new(config().with_holes(5)).unwrap();
        let err = runner
            .run_with(
                move |holes| Scripted {
                    holes,
                    actual: {
                        let counter = counter.clone();
                        move |h: usize| {
                            counter.set(counter.get() + 1);
                            if counter.get() == 3 {
                                h + 1
                            } else {
                                h
                            }
                        }
                    },
                    plays: Rc::new(Cell::new(0)),
                },
                &mut (),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentHoleCount {
                desired: 5,
                expected: 5,
                actual: 6,
                repeat: 2
            }
        ));
    }

    #[test]
    fn stops_once_the_threshold_is_reached() {
        let cfg = config()
            .with_hole_size(1.0)
            .with_treasure(TreasureSpec::Circle { radius: 30.0 })
            .with_max_holes(50);
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let summary = runner.run(&mut ()).unwrap();
        assert!(summary.stopped_early);
        let last = summary.rows.last().unwrap();
        assert_eq!(last.success_rate, 100.0);
        assert!(last.desired_holes < 50);
        assert!(summary.rows[..summary.rows.len() - 1]
            .iter()
            .all(|r| r.success_rate < 100.0));
    }

    #[test]
    fn same_seed_same_rows() {
        let cfg = config().with_hole_size(1.0).with_max_holes(30);
        let a = ExperimentRunner::try_new(cfg.clone())
            .unwrap()
            .run(&mut ())
            .unwrap();
        let b = ExperimentRunner::try_new(cfg).unwrap().run(&mut ()).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.seed, 42);
        // Skipped counts repeat the previous layout, so neighbouring rows always differ.
        assert!(a
            .rows
            .windows(2)
            .all(|w| w[0].actual_holes != w[1].actual_holes));
    }

    #[test]
    fn anomalies_warn_on_the_second_trial() {
        let cfg = config()
            .with_field_size(50.0)
            .with_hole_size(5.0)
            .with_holes(2_000)
            .with_repeats(3)
            .with_return_after_hit(false);
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let mut sink = VecSink::new();
        let summary = runner.run(&mut sink).unwrap();
        assert!(summary.warnings >= 1);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, ExperimentEvent::Warning { .. })));
        assert_eq!(summary.rows.len(), 1);
    }

    #[test]
    fn dumps_the_field_at_the_requested_count() {
        let cfg = config()
            .with_hole_size(1.0)
            .with_holes(20)
            .with_repeats(2)
            .with_dump_at_holes(Some(20));
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let mut sink = VecSink::new();
        runner.run(&mut sink).unwrap();
        let dump = sink
            .as_slice()
            .iter()
            .find_map(|e| match e {
                ExperimentEvent::FieldDumped { dump, .. } => Some(dump.clone()),
                _ => None,
            })
            .unwrap();
        assert!(dump.starts_with("intersect\n100 100\ncircularTreasure: "));
    }

    #[test]
    fn point_cloud_rows_report_means() {
        let points: Vec<[f64; 2]> = (0..100)
            .map(|i| [(i % 10) as f64 * 2.0, (i / 10) as f64 * 2.0])
            .collect();
        let cloud = ArtefactCloud::from_points(points).unwrap();
        let cfg = config()
            .with_hole_size(1.0)
            .with_treasure(TreasureSpec::Shape(TreasureShape::PointCloud(Arc::new(
                cloud,
            ))))
            .with_return_after_hit(false)
            .with_max_holes(5);
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let summary = runner.run(&mut ()).unwrap();
        assert!(!summary.rows.is_empty());
        for row in &summary.rows {
            assert!(row.artefacts.is_some());
            assert!(row.holes_succeeded.is_some());
        }
    }

    #[test]
    fn polygon_datasets_are_loaded_once_and_played() {
        let square = vec![
            [300.0, 700.0],
            [320.0, 700.0],
            [320.0, 720.0],
            [300.0, 720.0],
            [300.0, 700.0],
        ];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encode_shapefile(&[square])).unwrap();

        // Holes every 5 units cannot miss a 20 x 20 site.
        let cfg = config()
            .with_hole_size(1.0)
            .with_layout(LayoutSpec::SquareGrid)
            .with_treasure(TreasureSpec::Polygon {
                path: file.path().to_path_buf(),
                rotate: false,
            })
            .with_holes(400)
            .with_dump_at_holes(Some(400));
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let mut sink = VecSink::new();
        let summary = runner.run(&mut sink).unwrap();

        assert_eq!(summary.rows, vec![ResultRow::new(400, 400, 100.0)]);
        let dump = sink
            .as_slice()
            .iter()
            .find_map(|e| match e {
                ExperimentEvent::FieldDumped { dump, .. } => Some(dump.clone()),
                _ => None,
            })
            .unwrap();
        assert!(dump.contains("\npolygonTreasure: 5\n"));
        assert_eq!(runner.into_cache().len(), 1);
    }

    #[test]
    fn small_hole_regime_changes_repeats_and_steps() {
        let plays = Rc::new(Cell::new(0));
        let cfg = config()
            .with_max_holes(12)
            .with_hole_increment(5)
            .with_small_holes_increment(Some(SmallHoles::new(2, 4)))
            .with_small_holes_repeats(Some(SmallHoles::new(3, 5)));
        let mut runner = ExperimentRunner::try_new(cfg).unwrap();
        let summary = runner
            .run_with(
                |holes| Scripted {
                    holes,
                    actual: |h: usize| h,
                    plays: plays.clone(),
                },
                &mut (),
            )
            .unwrap();
        let desired: Vec<usize> = summary.rows.iter().map(|r| r.desired_holes).collect();
        // 1, 3, 5 by twos, then by fives.
        assert_eq!(desired, vec![1, 3, 5, 10]);
        assert_eq!(plays.get(), 3 + 3 + 3 + 10);
    }

    #[test]
    fn the_run_is_bracketed_by_events() {
        let mut runner = ExperimentRunner::try_new(
            config()
                .with_layout(LayoutSpec::SquareGrid)
                .with_max_holes(4),
        )
        .unwrap();
        let mut sink = VecSink::new();
        runner.run(&mut sink).unwrap();
        let events = sink.as_slice();
        assert!(matches!(
            events.first(),
            Some(ExperimentEvent::RunStarted {
                layout: "nonStaggered",
                seed: 42,
                ..
            })
        ));
        assert!(matches!(
            events.last(),
            Some(ExperimentEvent::RunFinished { .. })
        ));
    }
}
