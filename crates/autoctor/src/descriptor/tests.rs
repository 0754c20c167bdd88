use super::*;
use pretty_assertions::assert_eq;

#[derive(Debug, PartialEq)]
struct Pair {
    left: Rc<String>,
    right: Rc<u32>,
}

fn pair_descriptor() -> TypeDescriptor<Pair> {
    TypeDescriptor::new()
        .with(vec![], |_| {
            Ok(Pair {
                left: Rc::new(String::new()),
                right: Rc::new(0),
            })
        })
        .constructor(
            ConstructorDescriptor::new(
                vec![TypeKey::of::<String>(), TypeKey::of::<u32>()],
                |args| {
                    Ok(Pair {
                        left: args.take()?,
                        right: args.take()?,
                    })
                },
            )
            .with_visibility(Visibility::Private),
        )
}

#[test]
fn descriptor_records_constructors_in_order() {
    let descriptor = pair_descriptor();
    assert!(descriptor.name().ends_with("Pair"));
    assert!(!descriptor.is_abstract());

    let arities: Vec<usize> = descriptor
        .constructors()
        .iter()
        .map(ConstructorDescriptor::arity)
        .collect();
    assert_eq!(arities, vec![0, 2]);

    let two_arg = &descriptor.constructors()[1];
    assert_eq!(
        two_arg.params(),
        &[TypeKey::of::<String>(), TypeKey::of::<u32>()]
    );
    assert_eq!(two_arg.visibility(), Visibility::Private);
    assert_eq!(descriptor.constructors()[0].visibility(), Visibility::Public);
}

#[test]
fn named_descriptor_without_constructors_is_abstract() {
    let descriptor: TypeDescriptor<Pair> = TypeDescriptor::named("Shape");
    assert_eq!(descriptor.name(), "Shape");
    assert!(descriptor.is_abstract());
}

#[test]
fn invoke_reads_arguments_in_order() {
    let descriptor = pair_descriptor();
    let args = Arguments::new(vec![
        Object::new(String::from("left")),
        Object::new(7_u32),
    ]);

    let pair = descriptor.constructors()[1].invoke(args).expect("invoke");
    assert_eq!(*pair.left, "left");
    assert_eq!(*pair.right, 7);
}

#[test]
fn invoke_rejects_wrong_argument_count() {
    let descriptor = pair_descriptor();
    let err = descriptor.constructors()[1]
        .invoke(Arguments::new(vec![Object::new(String::new())]))
        .expect_err("arity mismatch");
    assert!(matches!(
        err,
        ConstructError::ArityMismatch {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn invoke_reports_argument_type_mismatch() {
    let descriptor = pair_descriptor();
    let args = Arguments::new(vec![Object::new(1_u32), Object::new(2_u32)]);
    let err = descriptor.constructors()[1]
        .invoke(args)
        .expect_err("type mismatch");
    match err {
        ConstructError::ArgumentMismatch {
            index,
            expected,
            found,
        } => {
            assert_eq!(index, 0);
            assert_eq!(expected, TypeKey::of::<String>());
            assert_eq!(found, TypeKey::of::<u32>());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn get_past_end_is_missing_argument() {
    let args = Arguments::new(vec![Object::new(1_u32)]);
    assert_eq!(args.len(), 1);
    assert!(!args.is_empty());
    assert!(args.object(0).is_some());
    assert!(args.object(1).is_none());
    assert!(matches!(
        args.get::<u32>(1),
        Err(ConstructError::MissingArgument { index: 1 })
    ));
    assert_eq!(args.get::<u32>(0).ok().as_deref(), Some(&1));
}

#[test]
fn debug_omits_constructor_bodies() {
    let rendered = format!("{:?}", pair_descriptor());
    assert!(rendered.contains("TypeDescriptor"), "{rendered}");
    assert!(rendered.contains("Private"), "{rendered}");
}
