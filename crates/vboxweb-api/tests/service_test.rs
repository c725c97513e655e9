use axum::{extract::State, http::StatusCode, routing::post, Router};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use vboxweb_api::{
    ApiError, FrontEnd, MachineState, ResultCode, SessionState, VboxConnectionConfig, VboxService,
    VboxServiceConfig,
};

// ─── Mock vboxwebsrv ─────────────────────────────────────────────────

#[derive(Default)]
struct Mock {
    /// (operation, request body) in arrival order.
    calls: Mutex<Vec<(String, String)>>,
    /// Registers m-3 (inaccessible) and m-4 (faulting getter) as well.
    broken_machines: bool,
    /// Progress objects complete this long after the VM launch.
    progress_delay: Option<Duration>,
    launched: Mutex<Option<Instant>>,
    fail_pause: bool,
    fail_unlock: bool,
}

impl Mock {
    /// Time until the launch progress completes; `None` once it has.
    fn progress_left(&self) -> Option<Duration> {
        let delay = self.progress_delay?;
        let started = (*self.launched.lock().unwrap())?;
        delay.checked_sub(started.elapsed())
    }

    /// `timeout` argument of every waitForCompletion call.
    fn wait_timeouts(&self) -> Vec<i64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| op == "IProgress_waitForCompletion")
            .map(|(_, body)| tag(body, "timeout").parse().unwrap())
            .collect()
    }

    fn count(&self, op: &str) -> usize {
        self.ops().iter().filter(|o| *o == op).count()
    }

    fn ops(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(op, _)| op.clone()).collect()
    }

    fn body_of(&self, op: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(o, _)| o == op)
            .map(|(_, b)| b.clone())
            .unwrap_or_default()
    }

    fn released(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| op == "IManagedObjectRef_release")
            .map(|(_, body)| tag(body, "_this"))
            .collect()
    }
}

fn operation(body: &str) -> String {
    let after = body.split("<soapenv:Body>").nth(1).unwrap_or_default();
    after
        .trim_start()
        .trim_start_matches('<')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn tag(body: &str, name: &str) -> String {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    match body.find(&open) {
        Some(start) => {
            let rest = &body[start + open.len()..];
            rest[..rest.find(&close).unwrap_or(0)].to_string()
        }
        None => String::new(),
    }
}

fn envelope(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:vbox="http://www.virtualbox.org/"><SOAP-ENV:Body>{inner}</SOAP-ENV:Body></SOAP-ENV:Envelope>"#
    )
}

fn ok(op: &str, values: &[&str]) -> (StatusCode, String) {
    let inner: String = values
        .iter()
        .map(|v| format!("<returnval>{v}</returnval>"))
        .collect();
    (
        StatusCode::OK,
        envelope(&format!("<vbox:{op}Response>{inner}</vbox:{op}Response>")),
    )
}

fn fault(code: ResultCode, message: &str) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        envelope(&format!(
            "<SOAP-ENV:Fault><faultcode>SOAP-ENV:Client</faultcode><faultstring>{message}</faultstring><detail><vbox:RuntimeFault><resultCode>{}</resultCode><returnval></returnval></vbox:RuntimeFault></detail></SOAP-ENV:Fault>",
            code.0
        )),
    )
}

async fn handle(State(mock): State<Arc<Mock>>, body: String) -> (StatusCode, String) {
    let op = operation(&body);
    mock.calls.lock().unwrap().push((op.clone(), body.clone()));
    let this = tag(&body, "_this");

    if mock.broken_machines && (this == "m-3" || this == "m-4") && op.starts_with("IMachine_get") {
        return match (op.as_str(), this.as_str()) {
            ("IMachine_getId", _) => ok(&op, &[&this.replace("m-", "uuid-")]),
            ("IMachine_getAccessible", "m-3") => ok(&op, &["false"]),
            ("IMachine_getAccessible", _) => ok(&op, &["true"]),
            ("IMachine_getName", "m-4") => ok(&op, &["legacy"]),
            _ => fault(ResultCode::INVALID_OBJECT_STATE, "The object is not ready"),
        };
    }

    match op.as_str() {
        "IWebsessionManager_logon" => match tag(&body, "username").as_str() {
            "intruder" => fault(ResultCode::ACCESS_DENIED, "Invalid username or password"),
            _ => ok(&op, &["vbox-1"]),
        },
        "IWebsessionManager_getSessionObject" => ok(&op, &["sess-1"]),
        "IVirtualBox_getAPIVersion" => ok(&op, &["7_0"]),
        "IVirtualBox_getVersion" => ok(&op, &["7.0.14"]),
        "IVirtualBox_getRevision" => ok(&op, &["161095"]),
        "IVirtualBox_getSettingsFilePath" => ok(&op, &["/home/ops/.config/VirtualBox/VirtualBox.xml"]),
        "IVirtualBox_getHost" => ok(&op, &["host-1"]),
        "IVirtualBox_getMachines" if mock.broken_machines => ok(&op, &["m-1", "m-3", "m-4", "m-2"]),
        "IVirtualBox_getMachines" => ok(&op, &["m-1", "m-2"]),
        "IVirtualBox_findMachine" => match tag(&body, "nameOrId").as_str() {
            "alpine" | "uuid-1" => ok(&op, &["m-1"]),
            "win11" | "uuid-2" => ok(&op, &["m-2"]),
            "uuid-3" if mock.broken_machines => ok(&op, &["m-3"]),
            other => fault(
                ResultCode::OBJECT_NOT_FOUND,
                &format!("Could not find a registered machine named '{other}'"),
            ),
        },
        "IHost_getProcessorCount" => ok(&op, &["8"]),
        "IHost_getMemorySize" => ok(&op, &["32768"]),
        "IHost_getMemoryAvailable" => ok(&op, &["20480"]),
        "IHost_getOperatingSystem" => ok(&op, &["Linux"]),
        "IHost_getOSVersion" => ok(&op, &["6.8.0"]),
        "IMachine_getAccessible" => ok(&op, &["true"]),
        "IMachine_getName" => ok(&op, &[if this == "m-1" { "alpine" } else { "win11" }]),
        "IMachine_getId" => ok(&op, &[if this == "m-1" { "uuid-1" } else { "uuid-2" }]),
        "IMachine_getState" => ok(&op, &[if this == "m-1" { "PoweredOff" } else { "Running" }]),
        "IMachine_getOSTypeId" => ok(&op, &[if this == "m-1" { "Linux_64" } else { "Windows11_64" }]),
        "IMachine_getMemorySize" => ok(&op, &["1024"]),
        "IMachine_getCPUCount" => ok(&op, &["2"]),
        "IMachine_getDescription" => ok(&op, &[]),
        "IMachine_getSessionState" => ok(&op, &[if this == "m-1" { "Unlocked" } else { "Locked" }]),
        "IMachine_getSnapshotCount" => ok(&op, &[if this == "m-1" { "3" } else { "0" }]),
        "IMachine_getCurrentSnapshot" => ok(&op, &["snap-c"]),
        "IMachine_findSnapshot" => ok(&op, &["snap-root"]),
        "IMachine_launchVMProcess" => {
            *mock.launched.lock().unwrap() = Some(Instant::now());
            ok(&op, &["prog-ok"])
        }
        "IMachine_takeSnapshot" => (
            StatusCode::OK,
            envelope(
                "<vbox:IMachine_takeSnapshotResponse><id>sid-new</id><returnval>prog-ok</returnval></vbox:IMachine_takeSnapshotResponse>",
            ),
        ),
        "ISnapshot_getId" => ok(&op, &[&this.replace("snap-", "sid-")]),
        "ISnapshot_getName" => ok(&op, &[&this.replace("snap-", "Snapshot ")]),
        "ISnapshot_getDescription" => ok(&op, &[]),
        "ISnapshot_getChildren" => match this.as_str() {
            "snap-root" => ok(&op, &["snap-a", "snap-c"]),
            "snap-a" => ok(&op, &["snap-b"]),
            _ => ok(&op, &[]),
        },
        "ISession_getConsole" => ok(&op, &["console-1"]),
        "ISession_getMachine" => ok(&op, &["smach-1"]),
        "IConsole_powerDown" => ok(&op, &["prog-fail"]),
        "IProgress_getCompleted" => match mock.progress_left() {
            Some(_) => ok(&op, &["false"]),
            None => ok(&op, &["true"]),
        },
        "IProgress_waitForCompletion" => {
            if let Some(left) = mock.progress_left() {
                let timeout: i64 = tag(&body, "timeout").parse().unwrap_or(-1);
                let nap = match u64::try_from(timeout) {
                    Ok(ms) => left.min(Duration::from_millis(ms)),
                    Err(_) => left,
                };
                tokio::time::sleep(nap).await;
            }
            ok(&op, &[])
        }
        "IProgress_getResultCode" => {
            let code = if this == "prog-fail" {
                ResultCode::INVALID_VM_STATE.0
            } else {
                0
            };
            ok(&op, &[&code.to_string()])
        }
        "IProgress_getErrorInfo" => ok(&op, &["err-1"]),
        "IProgress_getDescription" => ok(&op, &["Powering off"]),
        "IVirtualBoxErrorInfo_getText" => ok(&op, &["Machine in state Saved cannot be powered down"]),
        "IConsole_pause" if mock.fail_pause => {
            fault(ResultCode::INVALID_VM_STATE, "Invalid machine state: Paused")
        }
        "ISession_unlockMachine" if mock.fail_unlock => {
            fault(ResultCode::INVALID_SESSION_STATE, "The session is not locked")
        }
        "IWebsessionManager_logoff"
        | "IManagedObjectRef_release"
        | "IMachine_lockMachine"
        | "ISession_unlockMachine"
        | "IConsole_powerButton"
        | "IConsole_pause"
        | "IConsole_resume"
        | "IConsole_reset" => ok(&op, &[]),
        _ => fault(ResultCode::NOT_IMPL, &format!("unexpected operation {op}")),
    }
}

async fn spawn() -> (Arc<Mock>, String) {
    spawn_with(Mock::default()).await
}

async fn spawn_with(mock: Mock) -> (Arc<Mock>, String) {
    let mock = Arc::new(mock);
    let app = Router::new()
        .route("/", post(handle))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (mock, format!("http://{addr}/"))
}

async fn connected() -> (Arc<Mock>, VboxService, String) {
    connected_with(Mock::default(), None, VboxServiceConfig::default()).await
}

async fn connected_with(
    mock: Mock,
    request_timeout_secs: Option<u64>,
    config: VboxServiceConfig,
) -> (Arc<Mock>, VboxService, String) {
    let (mock, endpoint) = spawn_with(mock).await;
    let mut connection = VboxConnectionConfig::new(endpoint).with_credentials("ops", "secret");
    connection.client.request_timeout_secs = request_timeout_secs;
    let mut svc = VboxService::with_config(config);
    let id = svc.connect(connection).await.unwrap();
    (mock, svc, id)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_and_disconnect() {
    let (mock, mut svc, id) = connected().await;

    assert!(svc.has_session(&id));
    let sessions = svc.list_sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].username, "ops");
    assert_eq!(sessions[0].api_version, "7_0");
    assert!(mock.body_of("IWebsessionManager_logon").contains("<password>secret</password>"));

    svc.disconnect(&id).await.unwrap();
    assert!(!svc.has_session(&id));
    assert!(mock
        .body_of("IWebsessionManager_logoff")
        .contains("<refIVirtualBox>vbox-1</refIVirtualBox>"));
}

#[tokio::test]
async fn test_logon_rejected() {
    let (_mock, endpoint) = spawn().await;
    let mut svc = VboxService::new();
    let err = svc
        .connect(VboxConnectionConfig::new(endpoint).with_credentials("intruder", "guess"))
        .await
        .unwrap_err();
    assert_eq!(err.result_code(), Some(ResultCode::ACCESS_DENIED));
    assert_eq!(svc.session_count(), 0);
}

#[tokio::test]
async fn test_server_info() {
    let (mock, mut svc, id) = connected().await;
    let info = svc.server_info(&id).await.unwrap();

    assert_eq!(info.version, "7.0.14");
    assert_eq!(info.api_version, "7_0");
    assert_eq!(info.revision, 161095);
    assert_eq!(info.host.processor_count, 8);
    assert_eq!(info.host.memory_size_mb, 32768);
    assert_eq!(info.host.memory_available_mb, 20480);
    assert_eq!(info.host.operating_system, "Linux");
    assert_eq!(mock.released(), vec!["host-1".to_string()]);
}

#[tokio::test]
async fn test_list_machines() {
    let (mock, mut svc, id) = connected().await;
    let machines = svc.list_machines(&id).await.unwrap();

    assert_eq!(machines.len(), 2);
    assert_eq!(machines[0].name, "alpine");
    assert_eq!(machines[0].state, MachineState::PoweredOff);
    assert_eq!(machines[0].session_state, SessionState::Unlocked);
    assert_eq!(machines[0].snapshot_count, 3);
    assert_eq!(machines[0].description, "");
    assert_eq!(machines[1].name, "win11");
    assert_eq!(machines[1].state, MachineState::Running);
    assert_eq!(machines[1].memory_mb, 1024);
    assert_eq!(mock.released(), vec!["m-1".to_string(), "m-2".to_string()]);
}

#[tokio::test]
async fn test_unknown_machine() {
    let (_mock, mut svc, id) = connected().await;
    let err = svc.power_off(&id, "ghost").await.unwrap_err();
    assert_eq!(err.result_code(), Some(ResultCode::OBJECT_NOT_FOUND));
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn test_start_machine() {
    let (mock, mut svc, id) = connected().await;
    svc.start_machine(&id, "alpine", None).await.unwrap();

    let launch = mock.body_of("IMachine_launchVMProcess");
    assert!(launch.contains("<_this>m-1</_this>"));
    assert!(launch.contains("<session>sess-1</session>"));
    assert!(launch.contains("<name>headless</name>"));

    let ops = mock.ops();
    let pos = |name: &str| ops.iter().position(|o| o == name).unwrap();
    assert!(pos("IMachine_launchVMProcess") < pos("IProgress_waitForCompletion"));
    assert!(pos("IProgress_waitForCompletion") < pos("ISession_unlockMachine"));
    let timeouts = mock.wait_timeouts();
    assert_eq!(timeouts.len(), 1);
    assert!((599_000..=600_000).contains(&timeouts[0]), "timeout {}", timeouts[0]);
}

#[tokio::test]
async fn test_start_machine_with_gui() {
    let (mock, mut svc, id) = connected().await;
    svc.start_machine(&id, "uuid-1", Some(FrontEnd::Gui))
        .await
        .unwrap();
    assert!(mock.body_of("IMachine_launchVMProcess").contains("<name>gui</name>"));
}

#[tokio::test]
async fn test_power_off_failure_reports_error_text_and_unlocks() {
    let (mock, mut svc, id) = connected().await;
    let err = svc.power_off(&id, "win11").await.unwrap_err();

    match err {
        ApiError::Operation { code, message } => {
            assert_eq!(code, ResultCode::INVALID_VM_STATE);
            assert_eq!(message, "Machine in state Saved cannot be powered down");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let lock = mock.body_of("IMachine_lockMachine");
    assert!(lock.contains("<lockType>Shared</lockType>"));
    assert!(mock.ops().contains(&"ISession_unlockMachine".to_string()));
    let released = mock.released();
    for reference in ["err-1", "prog-fail", "console-1", "sess-1", "m-2"] {
        assert!(released.contains(&reference.to_string()), "{reference} not released");
    }
}

#[tokio::test]
async fn test_console_actions() {
    let (mock, mut svc, id) = connected().await;
    svc.acpi_shutdown(&id, "win11").await.unwrap();
    svc.pause(&id, "win11").await.unwrap();
    svc.resume(&id, "win11").await.unwrap();
    svc.reset(&id, "win11").await.unwrap();

    let ops = mock.ops();
    for op in ["IConsole_powerButton", "IConsole_pause", "IConsole_resume", "IConsole_reset"] {
        assert!(ops.contains(&op.to_string()), "{op} not called");
    }
    let locks = ops.iter().filter(|o| *o == "IMachine_lockMachine").count();
    let unlocks = ops.iter().filter(|o| *o == "ISession_unlockMachine").count();
    assert_eq!(locks, 4);
    assert_eq!(unlocks, 4);
}

#[tokio::test]
async fn test_take_snapshot() {
    let (mock, mut svc, id) = connected().await;
    let snapshot_id = svc
        .take_snapshot(&id, "alpine", "before-upgrade", "pre 3.20")
        .await
        .unwrap();

    assert_eq!(snapshot_id, "sid-new");
    let take = mock.body_of("IMachine_takeSnapshot");
    assert!(take.contains("<_this>smach-1</_this>"));
    assert!(take.contains("<name>before-upgrade</name>"));
    assert!(take.contains("<description>pre 3.20</description>"));
    assert!(mock.released().contains(&"smach-1".to_string()));
}

#[tokio::test]
async fn test_list_snapshots_depth_first() {
    let (_mock, mut svc, id) = connected().await;
    let snapshots = svc.list_snapshots(&id, "alpine").await.unwrap();

    let names: Vec<&str> = snapshots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Snapshot root", "Snapshot a", "Snapshot b", "Snapshot c"]);
    let depths: Vec<usize> = snapshots.iter().map(|s| s.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1]);
    assert_eq!(snapshots[0].parent_id, None);
    assert_eq!(snapshots[2].parent_id.as_deref(), Some("sid-a"));
    let current: Vec<&str> = snapshots
        .iter()
        .filter(|s| s.current)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(current, vec!["sid-c"]);
}

#[tokio::test]
async fn test_list_snapshots_without_any() {
    let (mock, mut svc, id) = connected().await;
    assert!(svc.list_snapshots(&id, "win11").await.unwrap().is_empty());
    assert!(!mock.ops().contains(&"IMachine_findSnapshot".to_string()));
}

#[tokio::test]
async fn test_list_machines_keeps_going_past_inaccessible() {
    let mock = Mock {
        broken_machines: true,
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, None, VboxServiceConfig::default()).await;
    let machines = svc.list_machines(&id).await.unwrap();

    let names: Vec<&str> = machines.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["alpine", "", "", "win11"]);
    assert_eq!(machines[1].id, "uuid-3");
    assert_eq!(machines[1].state, MachineState::Other("Inaccessible".into()));
    assert!(!machines[1].is_accessible());
    assert_eq!(machines[2].id, "uuid-4");
    assert!(!machines[2].is_accessible());
    assert!(machines[3].is_accessible());
    assert_eq!(mock.released(), vec!["m-1", "m-3", "m-4", "m-2"]);
}

#[tokio::test]
async fn test_machine_info_of_inaccessible_machine() {
    let mock = Mock {
        broken_machines: true,
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, None, VboxServiceConfig::default()).await;

    let info = svc.machine_info(&id, "uuid-3").await.unwrap();
    assert_eq!(info.id, "uuid-3");
    assert_eq!(info.state.as_str(), "Inaccessible");
    assert!(!mock.ops().contains(&"IMachine_getState".to_string()));
    assert_eq!(mock.released(), vec!["m-3"]);
}

#[tokio::test]
async fn test_progress_wait_is_sliced_below_request_timeout() {
    let mock = Mock {
        progress_delay: Some(Duration::from_millis(1300)),
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, Some(1), VboxServiceConfig::default()).await;

    svc.start_machine(&id, "alpine", None).await.unwrap();

    let timeouts = mock.wait_timeouts();
    assert!(timeouts.len() >= 2, "waits: {timeouts:?}");
    assert!(timeouts.iter().all(|t| (0..1000).contains(t)), "waits: {timeouts:?}");
    assert_eq!(mock.count("ISession_unlockMachine"), 1);
}

#[tokio::test]
async fn test_progress_wait_times_out() {
    let mock = Mock {
        progress_delay: Some(Duration::from_secs(3600)),
        ..Default::default()
    };
    let config = VboxServiceConfig {
        wait_timeout_seconds: Some(1),
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, None, config).await;

    let err = svc.start_machine(&id, "alpine", None).await.unwrap_err();
    match err {
        ApiError::Timeout(what) => assert_eq!(what, "Powering off"),
        other => panic!("unexpected error: {other:?}"),
    }
    let timeouts = mock.wait_timeouts();
    assert!((900..=1000).contains(&timeouts[0]), "waits: {timeouts:?}");
    assert_eq!(mock.count("ISession_unlockMachine"), 1);
    assert!(mock.released().contains(&"prog-ok".to_string()));
}

#[tokio::test]
async fn test_unlock_failure_after_action_failure_keeps_action_error() {
    let mock = Mock {
        fail_pause: true,
        fail_unlock: true,
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, None, VboxServiceConfig::default()).await;

    let err = svc.pause(&id, "win11").await.unwrap_err();
    assert_eq!(err.result_code(), Some(ResultCode::INVALID_VM_STATE));
    assert_eq!(mock.count("ISession_unlockMachine"), 1);
    let released = mock.released();
    for reference in ["console-1", "sess-1", "m-2"] {
        assert!(released.contains(&reference.to_string()), "{reference} not released");
    }
}

#[tokio::test]
async fn test_unlock_failure_after_success_is_reported() {
    let mock = Mock {
        fail_unlock: true,
        ..Default::default()
    };
    let (mock, mut svc, id) = connected_with(mock, None, VboxServiceConfig::default()).await;

    let err = svc.resume(&id, "win11").await.unwrap_err();
    assert_eq!(err.result_code(), Some(ResultCode::INVALID_SESSION_STATE));
    assert!(mock.ops().contains(&"IConsole_resume".to_string()));
    assert!(mock.released().contains(&"sess-1".to_string()));

    let err = svc.start_machine(&id, "alpine", None).await.unwrap_err();
    assert_eq!(err.result_code(), Some(ResultCode::INVALID_SESSION_STATE));
}
