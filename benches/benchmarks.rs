//! Benchmarks for dotnet-standards.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dotnet_standards::config::Config;
use dotnet_standards::core::formatter::parse_version;
use dotnet_standards::core::hook::render_script;

fn benchmark_version_parsing(c: &mut Criterion) {
    c.bench_function("version_parsing", |b| {
        b.iter(|| parse_version(black_box("5.1.250801+4a851ea9707f87d381166d6f5b4e42a4d1a1da4b")));
    });
}

fn benchmark_hook_script(c: &mut Criterion) {
    c.bench_function("hook_script", |b| {
        b.iter(|| render_script(black_box("standards check")));
    });
}

fn benchmark_config_parsing(c: &mut Criterion) {
    let toml_content = r#"
[formatter]
tool = "dotnet-format"
verbosity = "minimal"
min_major_version = 5

[projects]
path = "testproject"
glob = "*.sln"

[hook]
command = "standards check"
"#;

    c.bench_function("config_parsing", |b| {
        b.iter(|| {
            let config: Config = toml::from_str(black_box(toml_content)).expect("parse config");
            black_box(config)
        });
    });
}

criterion_group!(
    benches,
    benchmark_version_parsing,
    benchmark_hook_script,
    benchmark_config_parsing
);
criterion_main!(benches);
