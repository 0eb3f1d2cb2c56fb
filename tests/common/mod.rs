//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use mule_config::{Codec, ConfigurationDocument};

/// A loan broker style configuration exercising catalogs, routers, filters,
/// profiles and properties.
pub const LOAN_BROKER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE mule-configuration PUBLIC "-//SymphonySoft //DTD mule-configuration XML V1.0//EN" "http://www.symphonysoft.com/dtds/mule/mule-configuration.dtd">
<mule-configuration id="loan-broker" version="1.0">
    <description>Loan broker example</description>
    <environment-properties>
        <property name="broker.timeout" value="3000"/>
        <system-property name="home" key="user.home" defaultValue="/tmp"/>
    </environment-properties>
    <mule-environment-properties synchronous="false" serverUrl="tcp://localhost:60504">
        <threading-profile maxThreadsActive="10" maxThreadsIdle="5"/>
        <pooling-profile maxActive="10" maxIdle="5" exhaustedAction="GROW"/>
        <queue-profile maxOutstandingMessages="1000"/>
    </mule-environment-properties>
    <connector name="vmConnector" className="org.mule.providers.vm.VMConnector">
        <properties>
            <property name="queueEvents" value="true"/>
        </properties>
    </connector>
    <transformers>
        <transformer name="RestRequestToCustomerRequest" className="org.mule.samples.loanbroker.transformers.RestRequestToCustomerRequest"/>
        <transformer name="LoanQuoteRequestToCreditProfileArgs" className="org.mule.samples.loanbroker.transformers.LoanQuoteRequestToCreditProfileArgs"/>
    </transformers>
    <global-endpoints>
        <endpoint name="CustomerRequests" address="vm://customer.requests" transformers="RestRequestToCustomerRequest"/>
        <endpoint name="LoanQuotes" address="vm://loan.quotes" connector="vmConnector"/>
        <endpoint name="CreditAgency" address="vm://credit.agency" synchronous="true"/>
        <endpoint name="BigBank" address="vm://bank.big"/>
        <endpoint name="SmallBank" address="vm://bank.small"/>
    </global-endpoints>
    <interceptor-stack name="default">
        <interceptor className="org.mule.interceptors.LoggingInterceptor"/>
        <interceptor className="org.mule.interceptors.TimerInterceptor"/>
    </interceptor-stack>
    <model name="loan-broker">
        <mule-descriptor name="LoanBroker" implementation="org.mule.samples.loanbroker.LoanBroker">
            <inbound-router>
                <global-endpoint name="CustomerRequests"/>
            </inbound-router>
            <outbound-router>
                <catch-all-strategy className="org.mule.routing.LoggingCatchAllStrategy">
                    <endpoint address="vm://unrouted"/>
                </catch-all-strategy>
                <router className="org.mule.routing.outbound.FilteringOutboundRouter">
                    <global-endpoint name="BigBank"/>
                    <filter className="org.mule.routing.filters.logic.AndFilter">
                        <left-filter className="org.mule.routing.filters.WildcardFilter" pattern="big*"/>
                        <right-filter className="org.mule.routing.filters.logic.NotFilter">
                            <filter className="org.mule.routing.filters.WildcardFilter" pattern="*rejected"/>
                        </right-filter>
                    </filter>
                </router>
                <router className="org.mule.routing.outbound.FilteringOutboundRouter">
                    <global-endpoint name="SmallBank"/>
                    <filter className="org.mule.routing.filters.WildcardFilter" pattern="small*"/>
                </router>
            </outbound-router>
            <interceptor name="default"/>
            <threading-profile maxThreadsActive="4"/>
        </mule-descriptor>
        <mule-descriptor name="CreditAgencyGateway" implementation="org.mule.samples.loanbroker.CreditAgencyGateway" inboundEndpoint="CreditAgency" outboundEndpoint="LoanQuotes" inboundTransformer="LoanQuoteRequestToCreditProfileArgs"/>
    </model>
</mule-configuration>
"#;

pub fn parse(text: &str) -> ConfigurationDocument {
    Codec::standard().parse(text).expect("fixture parses")
}

pub fn loan_broker() -> ConfigurationDocument {
    parse(LOAN_BROKER)
}

/// Wrap a fragment in a minimal root element.
pub fn document(body: &str) -> String {
    format!(r#"<mule-configuration id="fragment" version="1.0">{}</mule-configuration>"#, body)
}

/// Shell-style wildcard match supporting a leading or trailing `*`.
pub fn wildcard(pattern: &str, value: &str) -> bool {
    match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
        (Some(suffix), _) => value.ends_with(suffix),
        (_, Some(prefix)) => value.starts_with(prefix),
        _ => pattern == value,
    }
}
