use delplan::{
    Answer, ConfirmationOracle, DeletePlanner, EntityKey, EntityModel, FixedPrompter,
    ModelDocument, OrderedPlan, PlanOutcome, PlannerConfig, QuestionKey, ScriptedPrompter,
    WarningKind, WorkingSet, WorkspaceModel, remove_descendants_of_selected,
};

const WORKSPACE: &str = r#"
projects:
  - name: app
    references: [lib/dist/lib.jar]
    roots:
      - path: src
        namespaces:
          - name: a
            containers:
              - name: Other.java
                types: [{ name: Other }]
          - name: a.b
          - name: a.b.c
            containers:
              - name: C.java
                types: [{ name: C }]
          - name: a.b.d
            containers:
              - name: D.java
                types: [{ name: D }]
          - name: foo.bar
            files: [{ name: readme.txt }]
          - name: foo.bar.baz
            containers:
              - name: Baz.java
                types: [{ name: Baz }]
          - name: foo.barbaz
          - name: p
            containers:
              - name: Pair.java
                types: [{ name: First }, { name: Second }]
              - name: Bean.java
                types:
                  - name: Bean
                    fields:
                      - { name: name, type: String }
                      - { name: active, type: boolean }
                    methods:
                      - { name: getName, returns: String }
                      - { name: setName, parameters: [String] }
                      - { name: isActive, returns: boolean }
                      - { name: setActive, parameters: [boolean] }
          - name: legacy
            containers:
              - name: Old.java
                read_only: true
                types: [{ name: Old }]
          - name: q
            linked: true
          - name: q.r
            containers:
              - name: R.java
                types: [{ name: R }]
    folders:
      - name: build
        folders:
          - name: tools
            files: [{ name: run.sh }]
  - name: lib
    roots:
      - path: dist/lib.jar
        archive: true
"#;

fn workspace() -> WorkspaceModel {
    ModelDocument::from_yaml_str(WORKSPACE)
        .expect("fixture parses")
        .build()
        .expect("fixture builds")
}

fn plan_with(
    model: &WorkspaceModel,
    config: PlannerConfig,
    handles: &[&str],
    prompter: &dyn delplan::Prompter,
) -> PlanOutcome {
    let planner = DeletePlanner::new(model, config);
    let mut oracle = ConfirmationOracle::new(prompter);
    planner.plan(handles, &mut oracle).expect("planning succeeds")
}

fn planned(outcome: PlanOutcome) -> OrderedPlan {
    match outcome {
        PlanOutcome::Planned(plan) => plan,
        PlanOutcome::Cancelled => panic!("planning was cancelled"),
    }
}

fn element_ids(plan: &OrderedPlan) -> Vec<&str> {
    plan.elements.iter().map(|symbol| symbol.id.as_str()).collect()
}

fn assert_no_coverage(model: &WorkspaceModel, plan: &OrderedPlan) {
    let entities = EntityModel::new(model);
    let keys = plan.keys();
    for a in &keys {
        for b in &keys {
            assert!(
                !entities.ancestor_of(a, b),
                "{a} already covers {b} in the plan"
            );
        }
    }
}

#[test]
fn pruning_is_idempotent_on_mixed_selections() {
    let model = workspace();
    let entities = EntityModel::new(&model);
    let mut set = WorkingSet::new();
    for handle in [
        "/app/src/a",
        "/app/src/a/Other.java",
        "app/src:a/Other.java#Other",
        "app/src:p",
        "/app/src/p/Pair.java",
        "app/src:p/Pair.java#First",
        "/app/src/foo/bar/readme.txt",
        "app/src:foo.bar",
    ] {
        set.insert(entities.classify(handle).expect("known handle"));
    }

    remove_descendants_of_selected(&entities, &mut set, true);
    let once = set.clone();
    remove_descendants_of_selected(&entities, &mut set, true);
    assert_eq!(set, once);
    assert_eq!(set.len(), 3);
}

#[test]
fn final_plan_has_no_duplicate_coverage() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &[
            "/app/src/a",
            "app/src:a/Other.java#Other",
            "/app/src/p/Pair.java",
            "app/src:p/Pair.java",
            "app/src:p/Bean.java#Bean.name",
            "app/src:p/Bean.java#Bean",
            "app/src:foo.bar",
            "/app/src/foo/bar/readme.txt",
        ],
        &FixedPrompter(Answer::Yes),
    ));

    assert_no_coverage(&model, &plan);
    assert_eq!(plan.resources.len(), 1);
    assert_eq!(
        element_ids(&plan),
        vec![
            "app/src:p/Pair.java",
            "app/src:p/Bean.java",
            "app/src:foo.bar",
        ]
    );
}

#[test]
fn namespaces_are_ordered_innermost_first() {
    let model = workspace();
    let config = PlannerConfig {
        expand_subpackages: true,
        ..PlannerConfig::default()
    };
    let plan = planned(plan_with(
        &model,
        config,
        &["app/src:a.b", "app/src:p/Pair.java"],
        &FixedPrompter(Answer::Yes),
    ));

    let depths: Vec<usize> = plan
        .elements
        .iter()
        .filter(|symbol| symbol.is_namespace())
        .map(|symbol| symbol.namespace_depth())
        .collect();
    assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(
        element_ids(&plan),
        vec![
            "app/src:p/Pair.java",
            "app/src:a.b.d",
            "app/src:a.b.c",
            "app/src:a.b",
        ]
    );
    assert_no_coverage(&model, &plan);
}

#[test]
fn subpackage_expansion_respects_segment_boundaries() {
    let model = workspace();
    let config = PlannerConfig {
        expand_subpackages: true,
        ..PlannerConfig::default()
    };
    let plan = planned(plan_with(
        &model,
        config,
        &["app/src:foo.bar"],
        &FixedPrompter(Answer::Yes),
    ));

    assert!(plan.subpackages_deleted);
    assert_eq!(
        element_ids(&plan),
        vec!["app/src:foo.bar.baz", "app/src:foo.bar"]
    );
}

#[test]
fn selecting_every_declaration_deletes_the_container_instead() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:p/Pair.java#First", "app/src:p/Pair.java#Second"],
        &FixedPrompter(Answer::Yes),
    ));
    assert_eq!(element_ids(&plan), vec!["app/src:p/Pair.java"]);
}

#[test]
fn declining_read_only_cancels_everything() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([Answer::No]);
    let outcome = plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:legacy/Old.java#Old", "app/src:p/Bean.java#Bean.name"],
        &prompter,
    );

    assert!(outcome.is_cancelled());
    assert_eq!(prompter.asked_keys(), vec![QuestionKey::ReadOnly]);
}

#[test]
fn accepting_read_only_keeps_planning() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:legacy"],
        &FixedPrompter(Answer::Yes),
    ));
    assert_eq!(element_ids(&plan), vec!["app/src:legacy"]);
}

#[test]
fn co_selected_getter_is_not_offered_again() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([Answer::Yes]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &[
            "app/src:p/Bean.java#Bean.name",
            "app/src:p/Bean.java#Bean.getName()",
        ],
        &prompter,
    ));

    assert!(plan.accessors_deleted);
    assert_eq!(prompter.asked().len(), 1);
    assert_eq!(
        element_ids(&plan),
        vec![
            "app/src:p/Bean.java#Bean.name",
            "app/src:p/Bean.java#Bean.getName()",
            "app/src:p/Bean.java#Bean.setName(String)",
        ]
    );
}

#[test]
fn yes_to_all_answers_every_accessor_question() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([Answer::YesToAll]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &[
            "app/src:p/Bean.java#Bean.name",
            "app/src:p/Bean.java#Bean.active",
        ],
        &prompter,
    ));

    assert_eq!(prompter.asked_keys(), vec![QuestionKey::Accessors]);
    assert_eq!(plan.elements.len(), 6);
}

#[test]
fn accessor_suggestion_can_be_disabled() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([]);
    let config = PlannerConfig {
        suggest_accessor_deletion: false,
        ..PlannerConfig::default()
    };
    let plan = planned(plan_with(
        &model,
        config,
        &["app/src:p/Bean.java#Bean.name"],
        &prompter,
    ));

    assert!(prompter.asked().is_empty());
    assert!(!plan.accessors_deleted);
    assert_eq!(plan.elements.len(), 1);
}

#[test]
fn parent_is_promoted_only_when_emptied() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:a.b.c", "app/src:a.b.d"],
        &FixedPrompter(Answer::Yes),
    ));
    assert_eq!(
        element_ids(&plan),
        vec!["app/src:a.b.d", "app/src:a.b.c", "app/src:a.b"]
    );
}

#[test]
fn selected_subpackage_folder_stays_in_the_plan() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:foo.bar", "/app/src/foo/bar/baz"],
        &FixedPrompter(Answer::Yes),
    ));

    assert_eq!(element_ids(&plan), vec!["app/src:foo.bar"]);
    let resources: Vec<&str> = plan.resources.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(resources, vec!["/app/src/foo/bar/baz"]);
    assert_no_coverage(&model, &plan);
}

#[test]
fn declined_linked_parent_is_kept() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([Answer::No]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:q.r"],
        &prompter,
    ));

    assert_eq!(element_ids(&plan), vec!["app/src:q.r"]);
    assert_eq!(prompter.asked_keys(), vec![QuestionKey::LinkedParent]);
}

#[test]
fn out_of_sync_entities_can_be_skipped() {
    let document = WORKSPACE.replace(
        "              - name: Pair.java\n",
        "              - name: Pair.java\n                in_sync: false\n",
    );
    let model = ModelDocument::from_yaml_str(&document)
        .unwrap()
        .build()
        .unwrap();
    let prompter = ScriptedPrompter::new([Answer::No]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:p/Pair.java#First", "/app/src/a/Other.java"],
        &prompter,
    ));

    assert_eq!(plan.elements.len(), 0);
    assert_eq!(plan.resources.len(), 1);
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.warnings[0].kind, WarningKind::OutOfSync);
}

#[test]
fn referenced_archive_can_be_kept() {
    let model = workspace();
    let prompter = ScriptedPrompter::new([Answer::NoToAll]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["/lib/dist/lib.jar", "lib/dist/lib.jar"],
        &prompter,
    ));

    assert!(plan.is_empty());
    assert_eq!(prompter.asked_keys(), vec![QuestionKey::ReferencedArchives]);
}

#[test]
fn folder_holding_source_roots_is_confirmed_once() {
    let mut model = workspace();
    let app = delplan::SymbolId::new("app");
    model.add_source_root(&app, "build/generated").unwrap();

    let prompter = ScriptedPrompter::new([Answer::Yes]);
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["/app/build", "/app/build/tools/run.sh"],
        &prompter,
    ));

    assert_eq!(
        prompter.asked_keys(),
        vec![QuestionKey::FoldersContainingSourceFolders]
    );
    assert_eq!(plan.keys(), vec![EntityKey::Resource("/app/build".into())]);
}

#[test]
fn unknown_handles_are_dropped_silently() {
    let model = workspace();
    let plan = planned(plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:nowhere", "/app/missing", "app/src:p/Pair.java"],
        &FixedPrompter(Answer::Yes),
    ));
    assert_eq!(element_ids(&plan), vec!["app/src:p/Pair.java"]);
}

#[test]
fn outcome_serializes_with_its_tag() {
    let model = workspace();
    let outcome = plan_with(
        &model,
        PlannerConfig::default(),
        &["app/src:p/Pair.java"],
        &FixedPrompter(Answer::Yes),
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "planned");
    assert_eq!(json["elements"][0]["id"], "app/src:p/Pair.java");
}
