//! Frame-driven interpolation of `{target, kind, start, end}` records.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Vertical slot of a tree glyph.
    Translate,
    /// Stroke dash offset of a path being drawn or erased.
    DashOffset,
    /// Dash offset of a connector whose last child moved.
    Delta,
    Opacity,
    /// Camera scale or translation of the graph view.
    Camera,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRecord<T> {
    pub target: T,
    pub kind: AnimationKind,
    pub start: f64,
    pub end: f64,
}

impl<T> AnimationRecord<T> {
    pub fn new(target: T, kind: AnimationKind, start: f64, end: f64) -> Self {
        Self {
            target,
            kind,
            start,
            end,
        }
    }

    pub fn value_at(&self, progress: f64) -> f64 {
        self.start + (self.end - self.start) * progress.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationStatus {
    Idle,
    Running(f64),
    /// Reported once, on the tick that reaches full progress.
    Finished,
}

/// Runs one cycle at a time; starting a new cycle discards the running one.
#[derive(Clone, Debug)]
pub struct Animator<T> {
    duration: f64,
    records: Vec<AnimationRecord<T>>,
    started_at: Option<f64>,
    progress: f64,
    generation: u64,
}

impl<T: PartialEq> Animator<T> {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration: duration_secs.max(f64::EPSILON),
            records: Vec::new(),
            started_at: None,
            progress: 1.0,
            generation: 0,
        }
    }

    pub fn start(&mut self, records: Vec<AnimationRecord<T>>, now: f64) -> u64 {
        self.generation += 1;
        self.records = records;
        self.progress = 0.0;
        self.started_at = (!self.records.is_empty()).then_some(now);
        if self.started_at.is_none() {
            self.progress = 1.0;
        }
        self.generation
    }

    pub fn cancel(&mut self) {
        if self.started_at.take().is_some() {
            self.progress = 1.0;
            self.generation += 1;
        }
    }

    pub fn tick(&mut self, now: f64) -> AnimationStatus {
        let Some(started_at) = self.started_at else {
            return AnimationStatus::Idle;
        };

        let elapsed = (now - started_at).max(0.0);
        self.progress = self.progress.max((elapsed / self.duration).min(1.0));
        if self.progress >= 1.0 {
            self.started_at = None;
            AnimationStatus::Finished
        } else {
            AnimationStatus::Running(self.progress)
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records(&self) -> &[AnimationRecord<T>] {
        &self.records
    }

    /// Current value of the record driving `target`/`kind`.
    pub fn value(&self, target: &T, kind: AnimationKind) -> Option<f64> {
        self.records
            .iter()
            .find(|record| record.kind == kind && &record.target == target)
            .map(|record| record.value_at(self.progress))
    }
}
