use super::*;

#[test]
fn test_completed_task() {
    let mut task = Task::spawn("test-ok", |monitor| {
        monitor.update(0.25, "Quarter");
        Ok("done".to_string())
    })
    .unwrap();
    assert!(task.join(None).unwrap());
    assert_eq!(task.state(), TaskState::Completed);
    assert_eq!(task.status(), "Completed");
    assert_eq!(task.progress(), 1.0);
    assert!(!task.is_alive());
    assert_eq!(task.get().unwrap(), "done");
}

#[test]
fn test_error_is_stored() {
    let mut task: Task<()> =
        Task::spawn("test-err", |_| Err(HmsaError::document("broken"))).unwrap();
    assert!(matches!(task.join(None), Err(HmsaError::InvalidDocument(_))));
    // Re-raised on every later query.
    assert!(matches!(task.join(None), Err(HmsaError::InvalidDocument(_))));
    assert!(matches!(task.get(), Err(HmsaError::InvalidDocument(_))));
    assert_eq!(task.state(), TaskState::Error);
    assert!(task.status().contains("broken"));
}

#[test]
fn test_result_taken_once() {
    let mut task = Task::spawn("test-once", |_| Ok(1u8)).unwrap();
    assert_eq!(task.get().unwrap(), 1);
    assert!(matches!(task.get(), Err(HmsaError::NotStarted)));
}

#[test]
fn test_join_timeout() {
    let (release, gate) = bounded::<()>(0);
    let mut task = Task::spawn("test-timeout", move |_| {
        gate.recv().map_err(|_| HmsaError::Cancelled)?;
        Ok(())
    })
    .unwrap();

    assert!(!task.join(Some(Duration::from_millis(20))).unwrap());
    assert!(task.is_alive());
    assert_eq!(task.state(), TaskState::Running);

    release.send(()).unwrap();
    assert!(task.join(Some(Duration::from_secs(10))).unwrap());
    assert!(!task.is_alive());
}

#[test]
fn test_cancel_between_stages() {
    let (entered, started) = bounded::<()>(1);
    let (release, gate) = bounded::<()>(0);
    let mut task: Task<u32> = Task::spawn("test-cancel", move |monitor| {
        monitor.update(0.1, "Stage 1");
        entered.send(()).map_err(|_| HmsaError::Cancelled)?;
        gate.recv().map_err(|_| HmsaError::Cancelled)?;
        monitor.check_cancelled()?;
        monitor.update(0.9, "Stage 2");
        Ok(7)
    })
    .unwrap();

    started.recv().unwrap();
    assert_eq!(task.progress(), 0.1);
    task.cancel();
    release.send(()).unwrap();

    assert!(matches!(task.get(), Err(HmsaError::Cancelled)));
    assert_eq!(task.status(), "Cancelled");
    assert_eq!(task.progress(), 1.0);
    assert_eq!(task.state(), TaskState::Cancelled);
}

#[test]
fn test_panicking_worker() {
    let mut task: Task<()> = Task::spawn("test-panic", |_| panic!("boom")).unwrap();
    assert!(matches!(task.get(), Err(HmsaError::WorkerPanicked)));
    assert_eq!(task.state(), TaskState::Error);
}

#[test]
fn test_progress_is_monotonic() {
    let (entered, started) = bounded::<()>(1);
    let (release, gate) = bounded::<()>(0);
    let mut task = Task::spawn("test-progress", move |monitor| {
        monitor.update(0.6, "Ahead");
        monitor.update(0.2, "Behind");
        entered.send(()).map_err(|_| HmsaError::Cancelled)?;
        gate.recv().map_err(|_| HmsaError::Cancelled)?;
        Ok(())
    })
    .unwrap();

    started.recv().unwrap();
    assert_eq!(task.progress(), 0.6);
    assert_eq!(task.status(), "Behind");
    release.send(()).unwrap();
    task.get().unwrap();
}
