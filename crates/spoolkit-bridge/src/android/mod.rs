// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android print host via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Every call goes through JNI into
// `android.print.PrintManager`, most of whose service accessors are hidden
// API, so each method shape is looked up by name and signature.
//
// ## Architecture notes
//
// The host context is held as a JNI weak global reference. Once the ART
// collector has reclaimed it, or if the host was built without one,
// `print_manager` answers `None` and the adapter reports `ServiceUnavailable`.
//
// Threads stay attached to the VM between calls, so each host method runs
// inside its own JNI local frame.
//
// Job state listeners need a Java object implementing
// `PrintManager.PrintJobStateChangeListener`. The application ships a shim
// (default `dev/spoolkit/PrintJobStateProxy`) shaped like:
//
//     final class PrintJobStateProxy implements PrintManager.PrintJobStateChangeListener {
//         PrintJobStateProxy(long token) { ... }
//         public void onPrintJobStateChanged(PrintJobId id) {
//             nativeOnPrintJobStateChanged(token, id.toString(), stateOf(id));
//         }
//         private static native void nativeOnPrintJobStateChanged(long token, String id, int state);
//     }
//
// The native method is registered with `RegisterNatives` when the host is
// built, so the shim may live under any class name.

#![cfg(target_os = "android")]

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{LazyLock, Mutex, PoisonError};

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue, WeakRef};
use jni::sys::{jint, jlong};
use jni::{JNIEnv, JavaVM, NativeMethod};

use spoolkit_core::config::BridgeConfig;
use spoolkit_core::error::{Result, SpoolError};
use spoolkit_core::types::{ApiLevel, ManagerMethod, PrintJobEvent, PrintJobState, ServiceDescriptor};

use crate::listener::JobStateRelay;
use crate::traits::{PrintHost, ServiceLookup};

// ---------------------------------------------------------------------------
// JNI constants
// ---------------------------------------------------------------------------

const PRINT_MANAGER_CLASS: &str = "android/print/PrintManager";

/// `Context.PRINT_SERVICE`.
const PRINT_SERVICE: &str = "print";

const NATIVE_CALLBACK_NAME: &str = "nativeOnPrintJobStateChanged";
const NATIVE_CALLBACK_SIG: &str = "(JLjava/lang/String;I)V";

/// Relays reachable from the native callback, keyed by proxy token.
static RELAYS: LazyLock<Mutex<HashMap<i64, JobStateRelay>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static NEXT_TOKEN: AtomicI64 = AtomicI64::new(1);

// ---------------------------------------------------------------------------
// JNI helpers
// ---------------------------------------------------------------------------

/// Clear any pending Java exception and map the JNI error into
/// `SpoolError::Bridge`.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: JniError) -> SpoolError {
    clear_exception(env);
    SpoolError::Bridge(format!("{context}: {e}"))
}

/// Like [`jni_err`], but a missing method becomes `ReflectionFailure`.
fn call_err(env: &mut JNIEnv<'_>, method: ManagerMethod, e: JniError) -> SpoolError {
    clear_exception(env);
    match e {
        JniError::MethodNotFound { name, sig } => SpoolError::ReflectionFailure {
            method: method.name().into(),
            reason: format!("no method {name}{sig} on {PRINT_MANAGER_CLASS}"),
        },
        other => SpoolError::Bridge(format!("{method}: {other}")),
    }
}

fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

/// Call a `()Ljava/lang/String;`-shaped method, `None` for a null result.
fn call_string(env: &mut JNIEnv<'_>, obj: &JObject<'_>, name: &str) -> Result<Option<String>> {
    let value = env
        .call_method(obj, name, "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err(env, name, e))?
        .l()
        .map_err(|e| jni_err(env, name, e))?;
    java_string(env, value)
}

fn java_string(env: &mut JNIEnv<'_>, value: JObject<'_>) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let value = JString::from(value);
    let text: String = env
        .get_string(&value)
        .map_err(|e| jni_err(env, "get_string", e))?
        .into();
    Ok(Some(text))
}

/// Load an application class through the context's class loader, which
/// unlike `FindClass` also works from threads attached by native code.
fn load_app_class<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject<'_>,
    jni_name: &str,
) -> Result<JClass<'a>> {
    let loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .map_err(|e| jni_err(env, "getClassLoader", e))?
        .l()
        .map_err(|e| jni_err(env, "getClassLoader->l", e))?;

    let binary_name = env
        .new_string(jni_name.replace('/', "."))
        .map_err(|e| jni_err(env, "new_string(class name)", e))?;

    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&binary_name)],
        )
        .map_err(|e| jni_err(env, "ClassLoader.loadClass", e))?
        .l()
        .map_err(|e| jni_err(env, "loadClass->l", e))?;

    Ok(JClass::from(class))
}

// ---------------------------------------------------------------------------
// Host struct
// ---------------------------------------------------------------------------

/// Local reference slots reserved per host call. `list_services` frees its
/// per-item references as it goes, so this bounds the working set only.
const LOCAL_FRAME_CAPACITY: i32 = 32;

/// A platform job-state proxy installed on the print manager.
pub struct JobStateProxy {
    token: i64,
    object: GlobalRef,
}

/// Android implementation of [`PrintHost`].
pub struct AndroidPrintHost {
    vm: JavaVM,
    /// `None` when the host was built without a context; every query then
    /// reports `ServiceUnavailable`.
    context: Option<WeakRef>,
    /// Shim class for job state proxies; `None` if the app does not ship it.
    listener_class: Option<GlobalRef>,
}

impl AndroidPrintHost {
    /// Build a host from a JNI call made by the plugin, with the
    /// application context it passed in.
    ///
    /// A null `context` still yields a host; it simply never resolves a
    /// print manager.
    pub fn new(env: &mut JNIEnv<'_>, context: &JObject<'_>, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;

        let vm = env
            .get_java_vm()
            .map_err(|e| jni_err(env, "get_java_vm", e))?;

        if context.is_null() {
            tracing::warn!("Android: print host built without a context");
            return Ok(Self {
                vm,
                context: None,
                listener_class: None,
            });
        }

        // A recreated Activity leaves this dangling, which surfaces as
        // `ServiceUnavailable` on the next query.
        let weak = env
            .new_weak_ref(context)
            .map_err(|e| jni_err(env, "new_weak_ref(context)", e))?;

        let listener_class = match Self::register_listener_class(env, context, config) {
            Ok(class) => Some(class),
            Err(e) => {
                tracing::warn!(
                    class = %config.job_listener_class,
                    error = %e,
                    "Android: job state proxy class unavailable"
                );
                None
            }
        };

        tracing::info!("Android: print host initialised");
        Ok(Self {
            vm,
            context: weak,
            listener_class,
        })
    }

    /// Build a host from the process-wide context set by the NDK glue.
    pub fn from_ndk_context(config: &BridgeConfig) -> Result<Self> {
        let ctx = ndk_context::android_context();
        // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
        // The pointer is valid for the lifetime of the process.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
            .map_err(|e| SpoolError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
        let mut env = vm
            .attach_current_thread_permanently()
            .map_err(|e| SpoolError::Bridge(format!("failed to attach JNI thread: {e}")))?;

        let ptr = ctx.context();
        let context = if ptr.is_null() {
            JObject::null()
        } else {
            // SAFETY: the NDK guarantees this pointer is a valid global
            // jobject for the hosting context.
            unsafe { JObject::from_raw(ptr.cast()) }
        };
        Self::new(&mut env, &context, config)
    }

    fn register_listener_class(
        env: &mut JNIEnv<'_>,
        context: &JObject<'_>,
        config: &BridgeConfig,
    ) -> Result<GlobalRef> {
        let class = load_app_class(env, context, &config.job_listener_class)?;
        let method = NativeMethod {
            name: NATIVE_CALLBACK_NAME.into(),
            sig: NATIVE_CALLBACK_SIG.into(),
            fn_ptr: native_on_print_job_state_changed as *mut c_void,
        };
        env.register_native_methods(&class, &[method])
            .map_err(|e| jni_err(env, "RegisterNatives", e))?;
        env.new_global_ref(&class)
            .map_err(|e| jni_err(env, "new_global_ref(listener class)", e))
    }

    /// Run `f` on this thread's JNI env inside a fresh local frame.
    ///
    /// The thread stays attached, so without the frame every local created
    /// here would live until the thread exits. Only global refs and plain
    /// Rust values may leave `f`.
    fn with_env<T>(&self, f: impl FnOnce(&mut JNIEnv<'_>) -> Result<T>) -> Result<T> {
        let mut env = self
            .vm
            .attach_current_thread_permanently()
            .map_err(|e| SpoolError::Bridge(format!("failed to attach JNI thread: {e}")))?;
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| Ok::<_, JniError>(f(env)))
            .map_err(|e| SpoolError::Bridge(format!("local frame: {e}")))?
    }

    /// The host context as a local reference, `None` once it is gone.
    fn context<'a>(&self, env: &mut JNIEnv<'a>) -> Result<Option<JObject<'a>>> {
        let Some(weak) = &self.context else {
            return Ok(None);
        };
        weak.upgrade_local(env)
            .map_err(|e| jni_err(env, "upgrade_local(context)", e))
    }
}

impl PrintHost for AndroidPrintHost {
    type Manager = GlobalRef;
    type Service = GlobalRef;
    type Session = GlobalRef;
    type Proxy = JobStateProxy;

    /// `android.os.Build.VERSION.SDK_INT`.
    fn api_level(&self) -> Result<ApiLevel> {
        let sdk_int = self.with_env(|env| {
            env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .map_err(|e| jni_err(env, "Build.VERSION.SDK_INT", e))?
                .i()
                .map_err(|e| jni_err(env, "SDK_INT->i", e))
        })?;
        let level = u32::try_from(sdk_int)
            .map_err(|_| SpoolError::Bridge(format!("negative SDK_INT {sdk_int}")))?;
        Ok(ApiLevel(level))
    }

    fn has_method(&self, method: ManagerMethod) -> Result<bool> {
        if matches!(
            method,
            ManagerMethod::AddPrintJobStateChangeListener
                | ManagerMethod::RemovePrintJobStateChangeListener
        ) && self.listener_class.is_none()
        {
            return Ok(false);
        }

        self.with_env(|env| {
            match env.get_method_id(PRINT_MANAGER_CLASS, method.name(), method.signature()) {
                Ok(_) => Ok(true),
                Err(JniError::MethodNotFound { .. }) | Err(JniError::JavaException) => {
                    clear_exception(env);
                    tracing::debug!(%method, "Android: print manager method not found");
                    Ok(false)
                }
                Err(e) => Err(jni_err(env, "get_method_id", e)),
            }
        })
    }

    fn print_manager(&self) -> Result<Option<GlobalRef>> {
        self.with_env(|env| {
            let Some(context) = self.context(env)? else {
                tracing::debug!("Android: host context is unavailable");
                return Ok(None);
            };

            let j_name = env
                .new_string(PRINT_SERVICE)
                .map_err(|e| jni_err(env, "new_string(PRINT_SERVICE)", e))?;

            let manager = env
                .call_method(
                    &context,
                    "getSystemService",
                    "(Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::Object(&j_name)],
                )
                .map_err(|e| jni_err(env, "getSystemService(print)", e))?
                .l()
                .map_err(|e| jni_err(env, "getSystemService->l", e))?;

            if manager.is_null() {
                // Devices built without the print framework.
                return Err(SpoolError::PlatformUnavailable);
            }

            env.new_global_ref(&manager)
                .map(Some)
                .map_err(|e| jni_err(env, "new_global_ref(PrintManager)", e))
        })
    }

    fn list_services(
        &self,
        manager: &GlobalRef,
        lookup: ServiceLookup,
    ) -> Result<Option<Vec<GlobalRef>>> {
        let method = lookup.method();

        self.with_env(|env| {
            let list = match lookup {
                ServiceLookup::Filtered(filter) => env.call_method(
                    manager,
                    method.name(),
                    method.signature(),
                    &[JValue::Int(filter.flags())],
                ),
                ServiceLookup::Installed | ServiceLookup::Enabled => {
                    env.call_method(manager, method.name(), method.signature(), &[])
                }
            }
            .map_err(|e| call_err(env, method, e))?
            .l()
            .map_err(|e| call_err(env, method, e))?;

            if list.is_null() {
                tracing::debug!(%method, "Android: print manager returned no list");
                return Ok(None);
            }

            let size = env
                .call_method(&list, "size", "()I", &[])
                .map_err(|e| jni_err(env, "List.size", e))?
                .i()
                .map_err(|e| jni_err(env, "List.size->i", e))?;

            let mut services = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
            for index in 0..size {
                let item = env
                    .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])
                    .map_err(|e| jni_err(env, "List.get", e))?
                    .l()
                    .map_err(|e| jni_err(env, "List.get->l", e))?;
                let global = env
                    .new_global_ref(&item)
                    .map_err(|e| jni_err(env, "new_global_ref(PrintServiceInfo)", e))?;
                env.delete_local_ref(item)
                    .map_err(|e| jni_err(env, "delete_local_ref", e))?;
                services.push(global);
            }

            tracing::info!(%method, count = services.len(), "Android: print services listed");
            Ok(Some(services))
        })
    }

    fn create_discovery_session(&self, manager: &GlobalRef) -> Result<GlobalRef> {
        let method = ManagerMethod::CreatePrinterDiscoverySession;

        self.with_env(|env| {
            let session = env
                .call_method(manager, method.name(), method.signature(), &[])
                .map_err(|e| call_err(env, method, e))?
                .l()
                .map_err(|e| call_err(env, method, e))?;

            if session.is_null() {
                return Err(SpoolError::Bridge(format!("{method} returned null")));
            }

            env.new_global_ref(&session)
                .map_err(|e| jni_err(env, "new_global_ref(PrinterDiscoverySession)", e))
        })
    }

    /// Read `PrintServiceInfo.getId()`, the package from its `ResolveInfo`,
    /// and the label when the host context is still alive.
    fn describe_service(&self, service: &GlobalRef) -> Result<ServiceDescriptor> {
        self.with_env(|env| {
            let id = call_string(env, service.as_obj(), "getId")?
                .ok_or_else(|| SpoolError::Bridge("PrintServiceInfo.getId returned null".into()))?;

            let resolve_info = env
                .call_method(
                    service,
                    "getResolveInfo",
                    "()Landroid/content/pm/ResolveInfo;",
                    &[],
                )
                .map_err(|e| jni_err(env, "getResolveInfo", e))?
                .l()
                .map_err(|e| jni_err(env, "getResolveInfo->l", e))?;

            if resolve_info.is_null() {
                return Ok(ServiceDescriptor {
                    id,
                    label: None,
                    package_name: None,
                });
            }

            let service_info = env
                .get_field(&resolve_info, "serviceInfo", "Landroid/content/pm/ServiceInfo;")
                .map_err(|e| jni_err(env, "ResolveInfo.serviceInfo", e))?
                .l()
                .map_err(|e| jni_err(env, "serviceInfo->l", e))?;

            let package_name = if service_info.is_null() {
                None
            } else {
                let value = env
                    .get_field(&service_info, "packageName", "Ljava/lang/String;")
                    .map_err(|e| jni_err(env, "ServiceInfo.packageName", e))?
                    .l()
                    .map_err(|e| jni_err(env, "packageName->l", e))?;
                java_string(env, value)?
            };

            let label = match self.context(env)? {
                Some(context) => {
                    let package_manager = env
                        .call_method(
                            &context,
                            "getPackageManager",
                            "()Landroid/content/pm/PackageManager;",
                            &[],
                        )
                        .map_err(|e| jni_err(env, "getPackageManager", e))?
                        .l()
                        .map_err(|e| jni_err(env, "getPackageManager->l", e))?;
                    let label = env
                        .call_method(
                            &resolve_info,
                            "loadLabel",
                            "(Landroid/content/pm/PackageManager;)Ljava/lang/CharSequence;",
                            &[JValue::Object(&package_manager)],
                        )
                        .map_err(|e| jni_err(env, "ResolveInfo.loadLabel", e))?
                        .l()
                        .map_err(|e| jni_err(env, "loadLabel->l", e))?;
                    if label.is_null() {
                        None
                    } else {
                        call_string(env, &label, "toString")?
                    }
                }
                None => None,
            };

            Ok(ServiceDescriptor {
                id,
                label,
                package_name,
            })
        })
    }

    fn add_job_state_proxy(&self, manager: &GlobalRef, relay: JobStateRelay) -> Result<JobStateProxy> {
        let class = self.listener_class.as_ref().ok_or_else(|| SpoolError::ReflectionFailure {
            method: ManagerMethod::AddPrintJobStateChangeListener.name().into(),
            reason: "job state proxy class not loaded".into(),
        })?;

        self.with_env(|env| {
            let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);

            let proxy = env
                .new_object(<&JClass>::from(class.as_obj()), "(J)V", &[JValue::Long(token)])
                .map_err(|e| jni_err(env, "new PrintJobStateProxy", e))?;
            let object = env
                .new_global_ref(&proxy)
                .map_err(|e| jni_err(env, "new_global_ref(proxy)", e))?;

            // Register before the platform can call back through the proxy.
            RELAYS
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(token, relay);

            let method = ManagerMethod::AddPrintJobStateChangeListener;
            if let Err(e) = env.call_method(
                manager,
                method.name(),
                method.signature(),
                &[JValue::Object(object.as_obj())],
            ) {
                RELAYS
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&token);
                return Err(call_err(env, method, e));
            }

            tracing::info!(token, "Android: job state proxy installed");
            Ok(JobStateProxy { token, object })
        })
    }

    fn remove_job_state_proxy(&self, manager: &GlobalRef, proxy: &JobStateProxy) -> Result<()> {
        let method = ManagerMethod::RemovePrintJobStateChangeListener;

        self.with_env(|env| {
            env.call_method(
                manager,
                method.name(),
                method.signature(),
                &[JValue::Object(proxy.object.as_obj())],
            )
            .map_err(|e| call_err(env, method, e))?;
            Ok(())
        })?;

        self.forget_job_state_proxy(proxy);
        tracing::info!(token = proxy.token, "Android: job state proxy removed");
        Ok(())
    }

    /// Drop the relay behind `proxy`. The Java object may still be
    /// registered with a print manager whose context is gone; its callbacks
    /// then find no relay and are ignored.
    fn forget_job_state_proxy(&self, proxy: &JobStateProxy) {
        let removed = RELAYS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&proxy.token)
            .is_some();
        tracing::debug!(token = proxy.token, removed, "Android: job state relay released");
    }
}

// ---------------------------------------------------------------------------
// Native callback
// ---------------------------------------------------------------------------

/// Bound to the shim's `nativeOnPrintJobStateChanged(long, String, int)`.
extern "system" fn native_on_print_job_state_changed<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    token: jlong,
    job_id: JString<'local>,
    state: jint,
) {
    let job_id: String = match env.get_string(&job_id) {
        Ok(id) => id.into(),
        Err(e) => {
            clear_exception(&mut env);
            tracing::warn!(token, error = %e, "Android: unreadable print job id");
            return;
        }
    };

    let relay = RELAYS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&token)
        .cloned();

    match relay {
        Some(relay) => {
            let event = PrintJobEvent::new(job_id, PrintJobState::from_code(state));
            relay.deliver(&event);
        }
        None => {
            tracing::debug!(token, job_id = %job_id, "Android: no relay for job state proxy");
        }
    }
}
