use criterion::{Criterion, black_box, criterion_group, criterion_main};

use jobdeck::formatting::{format_salary, format_skills};
use jobdeck::models::{JobId, JobPosting, JobSource, RecommendedJobPosting};
use jobdeck::tui::app::filter::{filter_external, job_stats, remote_count};

fn sample_jobs(count: usize) -> Vec<JobPosting> {
    let sources = JobSource::FILTERABLE;
    (0..count)
        .map(|i| JobPosting {
            id: JobId::from(i as i64),
            title: format!("Software Engineer {}", i),
            company: format!("Company {}", i % 37),
            location: if i % 4 == 0 { "Remote".to_string() } else { "Berlin".to_string() },
            source: sources[i % sources.len()].clone(),
            skills: vec!["rust".into(), "sql".into(), "aws".into(), "k8s".into()],
            salary_min: Some(80000.0 + i as f64),
            salary_max: Some(120000.0),
            posted_date: None,
            is_enabled: i % 3 == 0,
            apply_url: None,
        })
        .collect()
}

fn benchmark_search(c: &mut Criterion) {
    let jobs = sample_jobs(1000);
    c.bench_function("filter_external 1000", |b| {
        b.iter(|| filter_external(black_box(&jobs), black_box("company 3")))
    });
}

fn benchmark_stats(c: &mut Criterion) {
    let jobs = sample_jobs(1000);
    let recs: Vec<RecommendedJobPosting> = sample_jobs(100)
        .into_iter()
        .map(|job| RecommendedJobPosting {
            job,
            match_score: 70,
            is_external: true,
        })
        .collect();

    c.bench_function("remote_count 1000", |b| {
        b.iter(|| remote_count(black_box(&jobs)))
    });
    c.bench_function("job_stats 1000", |b| {
        b.iter(|| job_stats(black_box(&jobs), black_box(&recs)))
    });
}

fn benchmark_row_formatting(c: &mut Criterion) {
    let jobs = sample_jobs(200);
    c.bench_function("format rows 200", |b| {
        b.iter(|| {
            for job in &jobs {
                black_box(format_salary(job.salary_min, job.salary_max));
                black_box(format_skills(&job.skills));
            }
        })
    });
}

criterion_group!(benches, benchmark_search, benchmark_stats, benchmark_row_formatting);
criterion_main!(benches);
