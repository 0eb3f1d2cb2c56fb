use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mule_config::{Codec, Validator};

fn descriptor(index: usize) -> String {
    format!(
        r#"<mule-descriptor name="Service{index}" implementation="org.example.Service{index}" inboundEndpoint="Endpoint{index}">
            <outbound-router>
                <router className="org.mule.routing.outbound.FilteringOutboundRouter">
                    <global-endpoint name="Endpoint{next}"/>
                    <filter className="org.mule.routing.filters.logic.NotFilter">
                        <filter className="org.mule.routing.filters.WildcardFilter" pattern="skip*"/>
                    </filter>
                </router>
            </outbound-router>
            <properties><property name="index" value="{index}"/></properties>
        </mule-descriptor>"#,
        index = index,
        next = (index + 1) % 50,
    )
}

fn sample_document() -> String {
    let endpoints: String = (0..50)
        .map(|index| format!(r#"<endpoint name="Endpoint{index}" address="vm://queue.{index}" transformers="ToString"/>"#))
        .collect();
    let descriptors: String = (0..50).map(descriptor).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mule-configuration id="bench" version="1.0">
    <connector name="vm" className="org.mule.providers.vm.VMConnector"/>
    <transformers>
        <transformer name="ToString" className="org.mule.transformers.simple.ByteArrayToString"/>
    </transformers>
    <global-endpoints>{endpoints}</global-endpoints>
    <model name="bench">{descriptors}</model>
</mule-configuration>"#
    )
}

fn bench_codec(c: &mut Criterion) {
    let text = sample_document();
    let codec = Codec::standard();
    let document = codec.parse(&text).expect("sample parses");
    let validator = Validator::standard();

    c.bench_function("parse", |b| b.iter(|| codec.parse(black_box(&text))));
    c.bench_function("serialize", |b| b.iter(|| codec.serialize(black_box(&document))));
    c.bench_function("validate", |b| b.iter(|| validator.validate(black_box(&document))));
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
