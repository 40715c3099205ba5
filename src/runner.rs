use std::{
    path::PathBuf,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use indicatif::ProgressBar;

use crate::{error::TaskError, overpass::Client, templates, utils::progress_bar};

pub struct Config {
    pub templates_dir: PathBuf,
    pub out_dir: PathBuf,
    pub bbox: String,
    pub delay: Duration,
    pub endpoint: String,
}

#[derive(Default)]
pub struct Summary {
    pub written: usize,
    pub failed: usize,
}

/// One worker thread pulling template names off a channel, so at most one
/// query is ever in flight and tasks run in submission order. After each task,
/// pass or fail, the worker arms a deadline `delay` in the future and sleeps
/// until it before taking the next task. Overpass rate-limits aggressively.
pub struct Runner {
    queue: Sender<String>,
    worker: JoinHandle<Summary>,
    progress: ProgressBar,
}

impl Runner {
    pub fn start(config: Config, task_count: u64) -> Self {
        let (queue, tasks) = mpsc::channel::<String>();
        let progress = progress_bar(task_count);

        let bar = progress.clone();
        let worker = thread::spawn(move || {
            let client = Client::new(config.endpoint.clone());
            let mut summary = Summary::default();
            let mut gate = Instant::now();

            for name in tasks {
                let wait = gate.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    thread::sleep(wait);
                }

                match run_task(&client, &config, &name) {
                    Ok(()) => {
                        summary.written += 1;
                        bar.println(format!("Done {name}"));
                    }
                    Err(e) => {
                        summary.failed += 1;
                        bar.println(format!("Error with {name}: {e}"));
                    }
                }
                bar.inc(1);
                gate = Instant::now() + config.delay;
            }

            summary
        });

        Self {
            queue,
            worker,
            progress,
        }
    }

    /// Enqueues a template name and returns immediately.
    pub fn submit(&self, name: String) {
        self.queue.send(name).expect("worker thread is gone");
    }

    /// Waits for every submitted task to finish, then reports the tally.
    pub fn drain(self) -> Summary {
        let Self {
            queue,
            worker,
            progress,
        } = self;

        drop(queue);
        let summary = worker.join().expect("worker thread panicked");
        progress.finish_and_clear();

        summary
    }
}

fn run_task(client: &Client, config: &Config, name: &str) -> Result<(), TaskError> {
    let template = templates::read(&config.templates_dir, name)?;
    let query = templates::substitute(&template, &config.bbox);

    let mut collection = client.execute(&query)?;
    collection.flatten()?;
    collection.write(&config.out_dir.join(templates::output_name(name)))
}
