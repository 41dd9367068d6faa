//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use route53_client::{Credential, Route53Client};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const API: &str = "/2012-12-12";
pub const XMLNS: &str = "https://route53.amazonaws.com/doc/2012-12-12/";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 指向 mock server 的客户端
pub fn mock_client(server: &MockServer) -> Route53Client {
    Route53Client::builder()
        .endpoint(server.uri())
        .build(Credential::new("AKIDEXAMPLE", "secret-key"))
        .unwrap()
}

/// 200 响应，XML 正文
pub fn xml(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(body.into())
}

/// 错误响应（`ErrorResponse` 文档）
pub fn error_xml(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", "text/xml")
        .set_body_string(format!(
            r#"<?xml version="1.0"?>
<ErrorResponse xmlns="{XMLNS}">
  <Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error>
  <RequestId>req-{code}</RequestId>
</ErrorResponse>"#
        ))
}

pub fn change_info_xml(root: &str, id: &str, status: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<{root} xmlns="{XMLNS}">
  <ChangeInfo>
    <Id>/change/{id}</Id>
    <Status>{status}</Status>
    <SubmittedAt>2024-10-01T12:00:00.000Z</SubmittedAt>
  </ChangeInfo>
</{root}>"#
    )
}

pub fn zone_xml(id: &str, name: &str) -> String {
    format!(
        "<HostedZone><Id>/hostedzone/{id}</Id><Name>{name}</Name>\
         <CallerReference>ref-{id}</CallerReference>\
         <Config><Comment>zone {id}</Comment></Config>\
         <ResourceRecordSetCount>2</ResourceRecordSetCount></HostedZone>"
    )
}

pub fn zones_page(zones: &[(&str, &str)], next_marker: Option<&str>) -> String {
    let items: String = zones.iter().map(|(id, name)| zone_xml(id, name)).collect();
    let tail = match next_marker {
        Some(marker) => format!("<IsTruncated>true</IsTruncated><NextMarker>{marker}</NextMarker>"),
        None => "<IsTruncated>false</IsTruncated>".to_string(),
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListHostedZonesResponse xmlns="{XMLNS}">
  <HostedZones>{items}</HostedZones>
  {tail}
  <MaxItems>100</MaxItems>
</ListHostedZonesResponse>"#
    )
}

pub fn a_record_xml(name: &str, value: &str) -> String {
    format!(
        "<ResourceRecordSet><Name>{name}</Name><Type>A</Type><TTL>300</TTL>\
         <ResourceRecords><ResourceRecord><Value>{value}</Value></ResourceRecord></ResourceRecords>\
         </ResourceRecordSet>"
    )
}

/// 依次返回预设响应，最后一个响应重复使用；同时统计调用次数
pub struct Scripted {
    responses: Vec<ResponseTemplate>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    pub fn new(responses: Vec<ResponseTemplate>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                responses,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl Respond for Scripted {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.responses.len() - 1);
        self.responses[idx].clone()
    }
}
