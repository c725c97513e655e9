//! Request and response types, one pair per remote operation.
//!
//! Managed object references travel as opaque strings in `_this` and in
//! reference-typed arguments and results.

operations! {
    // ── IWebsessionManager ──────────────────────────────────────────

    /// Authenticate and obtain an `IVirtualBox` reference.
    "IWebsessionManager_logon" => IWebsessionManagerLogon {
        username: String = "username",
        password: String = "password",
    } -> IWebsessionManagerLogonResponse {
        returnval: String = "returnval",
    }

    /// Obtain the `ISession` object bound to a logged-on `IVirtualBox`.
    "IWebsessionManager_getSessionObject" => IWebsessionManagerGetSessionObject {
        ref_ivirtualbox: String = "refIVirtualBox",
    } -> IWebsessionManagerGetSessionObjectResponse {
        returnval: String = "returnval",
    }

    /// End the web session and drop every reference issued for it.
    "IWebsessionManager_logoff" => IWebsessionManagerLogoff {
        ref_ivirtualbox: String = "refIVirtualBox",
    } -> IWebsessionManagerLogoffResponse {}

    "IManagedObjectRef_release" => IManagedObjectRefRelease {
        this: String = "_this",
    } -> IManagedObjectRefReleaseResponse {}

    // ── IVirtualBox ─────────────────────────────────────────────────

    "IVirtualBox_getVersion" => IVirtualBoxGetVersion {
        this: String = "_this",
    } -> IVirtualBoxGetVersionResponse {
        returnval: String = "returnval",
    }

    "IVirtualBox_getAPIVersion" => IVirtualBoxGetAPIVersion {
        this: String = "_this",
    } -> IVirtualBoxGetAPIVersionResponse {
        returnval: String = "returnval",
    }

    "IVirtualBox_getRevision" => IVirtualBoxGetRevision {
        this: String = "_this",
    } -> IVirtualBoxGetRevisionResponse {
        returnval: u32 = "returnval",
    }

    "IVirtualBox_getMachines" => IVirtualBoxGetMachines {
        this: String = "_this",
    } -> IVirtualBoxGetMachinesResponse {
        returnval: Vec<String> = "returnval",
    }

    /// Look up a registered machine by name or UUID.
    "IVirtualBox_findMachine" => IVirtualBoxFindMachine {
        this: String = "_this",
        name_or_id: String = "nameOrId",
    } -> IVirtualBoxFindMachineResponse {
        returnval: String = "returnval",
    }

    "IVirtualBox_getHost" => IVirtualBoxGetHost {
        this: String = "_this",
    } -> IVirtualBoxGetHostResponse {
        returnval: String = "returnval",
    }

    "IVirtualBox_getSettingsFilePath" => IVirtualBoxGetSettingsFilePath {
        this: String = "_this",
    } -> IVirtualBoxGetSettingsFilePathResponse {
        returnval: String = "returnval",
    }

    // ── IMachine ────────────────────────────────────────────────────

    "IMachine_getName" => IMachineGetName {
        this: String = "_this",
    } -> IMachineGetNameResponse {
        returnval: String = "returnval",
    }

    "IMachine_getId" => IMachineGetId {
        this: String = "_this",
    } -> IMachineGetIdResponse {
        returnval: String = "returnval",
    }

    "IMachine_getState" => IMachineGetState {
        this: String = "_this",
    } -> IMachineGetStateResponse {
        returnval: String = "returnval",
    }

    "IMachine_getOSTypeId" => IMachineGetOSTypeId {
        this: String = "_this",
    } -> IMachineGetOSTypeIdResponse {
        returnval: String = "returnval",
    }

    "IMachine_getMemorySize" => IMachineGetMemorySize {
        this: String = "_this",
    } -> IMachineGetMemorySizeResponse {
        returnval: u32 = "returnval",
    }

    "IMachine_getCPUCount" => IMachineGetCPUCount {
        this: String = "_this",
    } -> IMachineGetCPUCountResponse {
        returnval: u32 = "returnval",
    }

    "IMachine_getDescription" => IMachineGetDescription {
        this: String = "_this",
    } -> IMachineGetDescriptionResponse {
        returnval: String = "returnval",
    }

    "IMachine_getSessionState" => IMachineGetSessionState {
        this: String = "_this",
    } -> IMachineGetSessionStateResponse {
        returnval: String = "returnval",
    }

    "IMachine_getCurrentSnapshot" => IMachineGetCurrentSnapshot {
        this: String = "_this",
    } -> IMachineGetCurrentSnapshotResponse {
        returnval: String = "returnval",
    }

    "IMachine_getSnapshotCount" => IMachineGetSnapshotCount {
        this: String = "_this",
    } -> IMachineGetSnapshotCountResponse {
        returnval: u32 = "returnval",
    }

    /// False when the settings file could not be read; most other getters
    /// fault on such a machine.
    "IMachine_getAccessible" => IMachineGetAccessible {
        this: String = "_this",
    } -> IMachineGetAccessibleResponse {
        returnval: bool = "returnval",
    }

    /// Spawn a VM process; `name` is the front-end type (`gui`, `headless`, ...).
    "IMachine_launchVMProcess" => IMachineLaunchVMProcess {
        this: String = "_this",
        session: String = "session",
        name: String = "name",
        environment_changes: Vec<String> = "environmentChanges",
    } -> IMachineLaunchVMProcessResponse {
        returnval: String = "returnval",
    }

    "IMachine_lockMachine" => IMachineLockMachine {
        this: String = "_this",
        session: String = "session",
        lock_type: String = "lockType",
    } -> IMachineLockMachineResponse {}

    /// An empty `name_or_id` returns the root snapshot.
    "IMachine_findSnapshot" => IMachineFindSnapshot {
        this: String = "_this",
        name_or_id: String = "nameOrId",
    } -> IMachineFindSnapshotResponse {
        returnval: String = "returnval",
    }

    /// Must be called on the session machine of a locked session.
    "IMachine_takeSnapshot" => IMachineTakeSnapshot {
        this: String = "_this",
        name: String = "name",
        description: String = "description",
        pause: bool = "pause",
    } -> IMachineTakeSnapshotResponse {
        id: String = "id",
        returnval: String = "returnval",
    }

    // ── ISession ────────────────────────────────────────────────────

    "ISession_getConsole" => ISessionGetConsole {
        this: String = "_this",
    } -> ISessionGetConsoleResponse {
        returnval: String = "returnval",
    }

    "ISession_getMachine" => ISessionGetMachine {
        this: String = "_this",
    } -> ISessionGetMachineResponse {
        returnval: String = "returnval",
    }

    "ISession_getState" => ISessionGetState {
        this: String = "_this",
    } -> ISessionGetStateResponse {
        returnval: String = "returnval",
    }

    "ISession_unlockMachine" => ISessionUnlockMachine {
        this: String = "_this",
    } -> ISessionUnlockMachineResponse {}

    // ── IConsole ────────────────────────────────────────────────────

    "IConsole_powerDown" => IConsolePowerDown {
        this: String = "_this",
    } -> IConsolePowerDownResponse {
        returnval: String = "returnval",
    }

    "IConsole_powerButton" => IConsolePowerButton {
        this: String = "_this",
    } -> IConsolePowerButtonResponse {}

    "IConsole_pause" => IConsolePause {
        this: String = "_this",
    } -> IConsolePauseResponse {}

    "IConsole_resume" => IConsoleResume {
        this: String = "_this",
    } -> IConsoleResumeResponse {}

    "IConsole_reset" => IConsoleReset {
        this: String = "_this",
    } -> IConsoleResetResponse {}

    // ── IProgress ───────────────────────────────────────────────────

    "IProgress_getCompleted" => IProgressGetCompleted {
        this: String = "_this",
    } -> IProgressGetCompletedResponse {
        returnval: bool = "returnval",
    }

    "IProgress_getPercent" => IProgressGetPercent {
        this: String = "_this",
    } -> IProgressGetPercentResponse {
        returnval: u32 = "returnval",
    }

    "IProgress_getResultCode" => IProgressGetResultCode {
        this: String = "_this",
    } -> IProgressGetResultCodeResponse {
        returnval: i32 = "returnval",
    }

    "IProgress_getDescription" => IProgressGetDescription {
        this: String = "_this",
    } -> IProgressGetDescriptionResponse {
        returnval: String = "returnval",
    }

    "IProgress_getErrorInfo" => IProgressGetErrorInfo {
        this: String = "_this",
    } -> IProgressGetErrorInfoResponse {
        returnval: String = "returnval",
    }

    /// `timeout` in milliseconds, `-1` waits indefinitely.
    "IProgress_waitForCompletion" => IProgressWaitForCompletion {
        this: String = "_this",
        timeout: i32 = "timeout",
    } -> IProgressWaitForCompletionResponse {}

    "IVirtualBoxErrorInfo_getText" => IVirtualBoxErrorInfoGetText {
        this: String = "_this",
    } -> IVirtualBoxErrorInfoGetTextResponse {
        returnval: String = "returnval",
    }

    // ── ISnapshot ───────────────────────────────────────────────────

    "ISnapshot_getName" => ISnapshotGetName {
        this: String = "_this",
    } -> ISnapshotGetNameResponse {
        returnval: String = "returnval",
    }

    "ISnapshot_getId" => ISnapshotGetId {
        this: String = "_this",
    } -> ISnapshotGetIdResponse {
        returnval: String = "returnval",
    }

    "ISnapshot_getDescription" => ISnapshotGetDescription {
        this: String = "_this",
    } -> ISnapshotGetDescriptionResponse {
        returnval: String = "returnval",
    }

    "ISnapshot_getChildren" => ISnapshotGetChildren {
        this: String = "_this",
    } -> ISnapshotGetChildrenResponse {
        returnval: Vec<String> = "returnval",
    }

    // ── IHost ───────────────────────────────────────────────────────

    "IHost_getProcessorCount" => IHostGetProcessorCount {
        this: String = "_this",
    } -> IHostGetProcessorCountResponse {
        returnval: u32 = "returnval",
    }

    "IHost_getMemorySize" => IHostGetMemorySize {
        this: String = "_this",
    } -> IHostGetMemorySizeResponse {
        returnval: u32 = "returnval",
    }

    "IHost_getMemoryAvailable" => IHostGetMemoryAvailable {
        this: String = "_this",
    } -> IHostGetMemoryAvailableResponse {
        returnval: u32 = "returnval",
    }

    "IHost_getOperatingSystem" => IHostGetOperatingSystem {
        this: String = "_this",
    } -> IHostGetOperatingSystemResponse {
        returnval: String = "returnval",
    }

    "IHost_getOSVersion" => IHostGetOSVersion {
        this: String = "_this",
    } -> IHostGetOSVersionResponse {
        returnval: String = "returnval",
    }
}
