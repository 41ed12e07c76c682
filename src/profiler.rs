use log::info;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Fenêtre glissante de `capacity` échantillons.
#[derive(Debug, Clone)]
struct Series {
    values: VecDeque<f32>,
    capacity: usize,
}

impl Series {
    fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, v: f32) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(v);
    }

    /// (moyenne, min, max), `None` si vide.
    fn summary(&self) -> Option<(f32, f32, f32)> {
        if self.values.is_empty() {
            return None;
        }
        let avg = self.values.iter().sum::<f32>() / self.values.len() as f32;
        let min = self.values.iter().copied().fold(f32::MAX, f32::min);
        let max = self.values.iter().copied().fold(f32::MIN, f32::max);
        Some((avg, min, max))
    }
}

#[derive(Debug)]
struct ProfilerInner {
    timings: HashMap<String, Series>, // durées en ms (profile_block)
    metrics: HashMap<String, Series>, // valeurs scalaires
    frame_times: Series,
    max_samples: usize,
}

impl ProfilerInner {
    fn push(map: &mut HashMap<String, Series>, max: usize, label: String, v: f32) {
        map.entry(label).or_insert_with(|| Series::new(max)).push(v);
    }
}

/// Profiler partagé et thread-safe
#[derive(Debug, Clone)]
pub struct Profiler {
    inner: Arc<RwLock<ProfilerInner>>,
}

impl Profiler {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            inner: Arc::new(RwLock::new(ProfilerInner {
                timings: HashMap::new(),
                metrics: HashMap::new(),
                frame_times: Series::new(max_samples),
                max_samples,
            })),
        }
    }

    /// Mesure globale d'une frame (RAII)
    pub fn frame(&self) -> FrameGuard {
        FrameGuard {
            profiler: self.clone(),
            start: Instant::now(),
        }
    }

    /// Profile un bloc de code et retourne sa valeur de retour
    pub fn profile_block<T, F>(&self, label: impl Into<String>, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        let dt = start.elapsed().as_secs_f32() * 1000.0;

        if let Ok(mut inner) = self.inner.write() {
            let max = inner.max_samples;
            ProfilerInner::push(&mut inner.timings, max, label.into(), dt);
        }
        result
    }

    /// Enregistre une métrique scalaire
    pub fn record_metric(&self, label: impl Into<String>, value: f32) {
        if let Ok(mut inner) = self.inner.write() {
            let max = inner.max_samples;
            ProfilerInner::push(&mut inner.metrics, max, label.into(), value);
        }
    }

    /// Retourne le FPS moyen
    pub fn fps(&self) -> f32 {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.frame_times.summary())
            .map(|(avg, _, _)| if avg > 0.0 { 1000.0 / avg } else { 0.0 })
            .unwrap_or(0.0)
    }

    /// Nombre de frames dans la fenêtre courante
    pub fn total_frames(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.frame_times.values.len())
            .unwrap_or(0)
    }

    /// Résumé des temps mesurés (moyenne, min, max)
    pub fn summary(&self) -> HashMap<String, (f32, f32, f32)> {
        self.inner
            .read()
            .map(|inner| summarize(&inner.timings))
            .unwrap_or_default()
    }

    /// Résumé des métriques scalaires (moyenne, min, max)
    pub fn metrics_summary(&self) -> HashMap<String, (f32, f32, f32)> {
        self.inner
            .read()
            .map(|inner| summarize(&inner.metrics))
            .unwrap_or_default()
    }

    /// Log toutes les métriques vers l'info log avec un target spécifique
    pub fn log_metrics_for_target(&self, target: &str, show_fps: bool) {
        if show_fps {
            info!(target: target, "{:.2} FPS", self.fps());
        }
        for (label, (avg, min, max)) in self.summary() {
            info!(
                target: target,
                "{}: avg = {:.3} ms | min = {:.3} ms | max = {:.3} ms",
                label, avg, min, max
            );
        }
        for (label, (avg, min, max)) in self.metrics_summary() {
            info!(target: target, "{label}: avg={avg:.1}, min={min:.0}, max={max:.0}");
        }
    }
}

fn summarize(map: &HashMap<String, Series>) -> HashMap<String, (f32, f32, f32)> {
    map.iter()
        .filter_map(|(k, s)| s.summary().map(|sum| (k.clone(), sum)))
        .collect()
}

/// Mesure globale d'une frame
pub struct FrameGuard {
    profiler: Profiler,
    start: Instant,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let dt = self.start.elapsed().as_secs_f32() * 1000.0;
        if let Ok(mut inner) = self.profiler.inner.write() {
            inner.frame_times.push(dt);
        }
    }
}

/// Macro helper : le target est le module appelant (`module_path!()`).
#[macro_export]
macro_rules! log_metrics_and_fps {
    ($profiler:expr) => {
        $profiler.log_metrics_for_target(module_path!(), true);
    };
}
