//! Request assembly and signing benchmarks.
//!
//! ```bash
//! cargo bench --bench signing
//! cargo bench --bench signing -- sign_request
//! ```

use aws_ec2::config::RegionEndpoints;
use aws_ec2::request::{Call, Ec2Operation, RequestResolver, UnsignedRequest};
use aws_ec2::{AwsCredentials, FixedClock, FormSigner, Region};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

fn resolver() -> RequestResolver {
    RequestResolver::new("2010-06-15", Arc::new(RegionEndpoints::aws().unwrap()))
}

fn terminate(resolver: &RequestResolver, ids: &[String]) -> UnsignedRequest {
    let call = Call::new(Ec2Operation::TerminateInstances)
        .in_region(Some(Region::UsEast1))
        .list("InstanceId", ids.iter().cloned());
    UnsignedRequest::assemble(resolver.resolve(&call).unwrap()).unwrap()
}

fn bench_assemble(c: &mut Criterion) {
    let resolver = resolver();
    let mut group = c.benchmark_group("assemble_request");

    for count in [1usize, 10, 100] {
        let ids: Vec<String> = (0..count).map(|i| format!("i-{:08x}", i)).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &ids, |b, ids| {
            b.iter(|| terminate(&resolver, black_box(ids)))
        });
    }
    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let resolver = resolver();
    let clock = FixedClock::from_rfc3339("2009-11-08T15:54:08.897Z").unwrap();
    let signer = FormSigner::new(AwsCredentials::new("identity", "credential"), Arc::new(clock)).unwrap();
    let mut group = c.benchmark_group("sign_request");

    for count in [1usize, 10, 100] {
        let ids: Vec<String> = (0..count).map(|i| format!("i-{:08x}", i)).collect();
        let request = terminate(&resolver, &ids);
        group.throughput(Throughput::Bytes(request.content_length() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &request, |b, request| {
            b.iter(|| signer.sign(black_box(request)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assemble, bench_sign);
criterion_main!(benches);
