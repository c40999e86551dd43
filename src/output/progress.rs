use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{emphasis, heading, highlight, success};

/// Progress tracking for the three audit phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1() -> Self {
        eprintln!("{}  {}", emphasis("⚙️"), heading("Phases"));
        let pb = create_spinner(
            highlight("Phase 1/3: Fetching projects and task catalog").to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, project_count: usize, task_count: usize) -> Self {
        self.pb.finish_with_message(
            success(format!(
                "Phase 1/3: Fetched {project_count} projects and {task_count} catalog tasks ✓"
            ))
            .to_string(),
        );
        let pb = create_spinner(
            highlight("Phase 2/3: Identifying deprecated task versions").to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_2_start_phase_3(self, deprecated_count: usize, project_count: usize) -> Self {
        self.pb.finish_with_message(
            success(format!(
                "Phase 2/3: Found {deprecated_count} deprecated task versions ✓"
            ))
            .to_string(),
        );
        let pb = create_bar(
            project_count,
            highlight("Phase 3/3: Scanning projects").to_string(),
        );
        Self { pb }
    }

    pub fn set_project(&self, project: &str) {
        self.pb
            .set_message(highlight(format!("Phase 3/3: Scanning {project}")).to_string());
    }

    pub fn advance(&self) {
        self.pb.inc(1);
    }

    pub fn finish_phase_3(self, finding_count: usize) {
        self.pb.finish_with_message(
            success(format!(
                "Phase 3/3: Scan complete, {finding_count} pipelines with deprecated tasks ✓"
            ))
            .to_string(),
        );
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_bar(len: usize, message: String) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {msg} [{bar:30}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(message);
    pb
}
