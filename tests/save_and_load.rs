use sigma_nn::{Matrix, Network, NetworkError, NetworkOptions, NetworkOptionsUpdate, SerializedNetwork};

#[test]
fn serialize_then_load_restores_everything() {
    let network = Network::with_options(
        vec![2, 5, 5, 1],
        NetworkOptionsUpdate::default().learning_rate(1.0).batch_size(5),
    );
    let snapshot = network.serialize();

    let mut loaded = Network::new(Vec::new());
    loaded.load(snapshot);
    assert_eq!(loaded.layers(), network.layers());
    assert_eq!(loaded.weights(), network.weights());
    assert_eq!(loaded.biases(), network.biases());
    assert_eq!(loaded.options(), network.options());
}

#[test]
fn snapshot_is_independent_of_the_live_network() {
    let mut network = Network::new(vec![2, 1]);
    let snapshot = network.serialize();
    network
        .learn(
            sigma_nn::VecStream::new(vec![Matrix::column(&[1.0, 1.0])]),
            sigma_nn::VecStream::new(vec![Matrix::column(&[1.0])]),
        )
        .unwrap();
    assert_ne!(network.serialize().weights, snapshot.weights);
}

#[test]
fn json_file_round_trip() -> Result<(), NetworkError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.json");
    let network = Network::with_options(vec![4, 3, 2], NetworkOptionsUpdate::default().progress(true));

    network.serialize().save_json(&path)?;
    let loaded = Network::from_json_file(&path)?;
    assert_eq!(loaded, network);
    Ok(())
}

#[test]
fn saving_never_overwrites_an_existing_model() -> Result<(), NetworkError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.json");
    let snapshot = Network::new(vec![2, 2]).serialize();
    snapshot.save_json(&path)?;
    let err = snapshot.save_json(&path).unwrap_err();
    assert!(matches!(err, NetworkError::Io(ref e) if e.kind() == std::io::ErrorKind::AlreadyExists));
    Ok(())
}

#[test]
fn loads_models_written_as_plain_nested_arrays() {
    let json = r#"{
        "layers": [2, 1],
        "weights": [[[0.5, -0.25]]],
        "biases": [[[0.1]]],
        "options": {"learningRate": 0.01, "batchSize": 512}
    }"#;
    let snapshot: SerializedNetwork = serde_json::from_str(json).unwrap();
    let network = Network::from(snapshot);
    assert_eq!(network.weights()[0].shape(), (1, 2));
    assert_eq!(
        network.options(),
        &NetworkOptions { learning_rate: 0.01, batch_size: 512, progress: false }
    );

    let out = network.feed_forward(&Matrix::column(&[1.0, 2.0])).unwrap();
    let z: f64 = 0.5 - 0.5 + 0.1;
    assert!((out.data[0][0] - 1.0 / (1.0 + (-z).exp())).abs() < 1e-12);
}

#[test]
fn model_file_with_ragged_weights_is_an_error() -> Result<(), NetworkError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ragged.json");
    std::fs::write(
        &path,
        r#"{"layers":[2,2],"weights":[[[0.5,-0.25],[0.1]]],"biases":[[[0.0],[0.0]]],
           "options":{"learningRate":1,"batchSize":1}}"#,
    )?;
    let err = Network::from_json_file(&path).unwrap_err();
    assert!(matches!(err, NetworkError::Json(_)), "got {:?}", err);
    Ok(())
}

#[test]
fn update_options_overwrites_only_given_fields() {
    let mut network = Network::with_options(
        vec![2, 5, 5, 1],
        NetworkOptionsUpdate::default().learning_rate(1.0).batch_size(5).progress(true),
    );
    network.update_options(NetworkOptionsUpdate {
        batch_size: Some(50),
        learning_rate: Some(5.0),
        ..Default::default()
    });
    assert_eq!(network.options().batch_size, 50);
    assert_eq!(network.options().learning_rate, 5.0);
    assert!(network.options().progress);

    network.update_options(NetworkOptionsUpdate::default().progress(false));
    assert!(!network.options().progress);
    assert_eq!(network.options().batch_size, 50);
}
